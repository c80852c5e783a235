//! storeassist — structured LLM orchestration for in-store assistant features.
//!
//! `orchestration::Orchestrator` is the entry point: it builds the task prompt
//! for a `schema::Mode`, makes one remote completion through `llm_client`, and
//! returns a schema-validated record or a classified `OrchestrationError`.
//! `render` is the HTML boundary; `routes` exposes both over HTTP.

pub mod config;
pub mod errors;
pub mod llm_client;
pub mod orchestration;
pub mod render;
pub mod routes;
pub mod schema;
pub mod state;

// Structured completion orchestration.
// Flow: RequestContext → builder::build_prompt → CompletionClient::complete
//       (through dispatch::run_to_completion for sync callers) → ValidatedResult.
// All remote calls go through llm_client — no direct HTTP here.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::BackendError;
use crate::schema::{Mode, SchemaViolation, ValidatedResult};

pub mod builder;
pub mod client;
pub mod dispatch;
pub mod handlers;
pub mod prompts;

#[cfg(test)]
pub mod testing;

use builder::{build_prompt, PromptError};
use client::CompletionClient;
use dispatch::{run_to_completion, DispatchError};

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Why an orchestration call produced no result. Never carries partial data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrchestrationError {
    #[error("no API credential is configured")]
    MissingCredential,

    #[error("remote call failed: {0}")]
    RemoteCallFailed(String),

    #[error("schema violation: {0}")]
    SchemaViolation(String),

    #[error("scheduler conflict: {0}")]
    SchedulerConflict(String),

    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Tag for `OrchestrationError`, used to pick user-facing messages and statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingCredential,
    RemoteCallFailed,
    SchemaViolation,
    SchedulerConflict,
    Timeout,
    InvalidRequest,
}

impl ErrorKind {
    /// Short message shown to end users. Distinct per kind.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::MissingCredential => "Not authenticated: please set an API key first.",
            ErrorKind::RemoteCallFailed => "Request failed: the AI service could not be reached.",
            ErrorKind::SchemaViolation => {
                "Response invalid: the AI returned data in an unexpected shape."
            }
            ErrorKind::SchedulerConflict => "Internal scheduling error: please try again.",
            ErrorKind::Timeout => "Request timed out: the AI service took too long to answer.",
            ErrorKind::InvalidRequest => "Invalid request: some required input is missing.",
        }
    }
}

impl OrchestrationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrchestrationError::MissingCredential => ErrorKind::MissingCredential,
            OrchestrationError::RemoteCallFailed(_) => ErrorKind::RemoteCallFailed,
            OrchestrationError::SchemaViolation(_) => ErrorKind::SchemaViolation,
            OrchestrationError::SchedulerConflict(_) => ErrorKind::SchedulerConflict,
            OrchestrationError::Timeout(_) => ErrorKind::Timeout,
            OrchestrationError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }
}

impl From<SchemaViolation> for OrchestrationError {
    fn from(e: SchemaViolation) -> Self {
        OrchestrationError::SchemaViolation(e.to_string())
    }
}

impl From<PromptError> for OrchestrationError {
    fn from(e: PromptError) -> Self {
        OrchestrationError::InvalidRequest(e.to_string())
    }
}

impl From<DispatchError> for OrchestrationError {
    fn from(e: DispatchError) -> Self {
        OrchestrationError::SchedulerConflict(e.to_string())
    }
}

impl From<BackendError> for OrchestrationError {
    fn from(e: BackendError) -> Self {
        match e {
            // Transport was fine; the model produced something unusable.
            BackendError::Malformed(msg) => OrchestrationError::SchemaViolation(msg),
            BackendError::Api { message, .. } => OrchestrationError::RemoteCallFailed(message),
            BackendError::Http(e) => OrchestrationError::RemoteCallFailed(e.to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request context
// ────────────────────────────────────────────────────────────────────────────

/// Input bundle for one orchestration call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    mode: Mode,
    persona: String,
    fields: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn new(mode: Mode, persona: impl Into<String>, fields: BTreeMap<String, String>) -> Self {
        Self {
            mode,
            persona: persona.into(),
            fields,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// Entry point for the presentation layer: prompt building, one completion,
/// validation. Cheap to clone; shares only the read-only credential.
#[derive(Clone)]
pub struct Orchestrator {
    client: CompletionClient,
}

impl Orchestrator {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    pub fn has_credential(&self) -> bool {
        self.client.has_credential()
    }

    /// Synchronous entry point. Blocks until the call resolves, whether or not
    /// the caller is already running inside a tokio runtime.
    pub fn orchestrate(
        &self,
        mode: Mode,
        persona: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<ValidatedResult, OrchestrationError> {
        let context = RequestContext::new(mode, persona, fields.clone());
        run_to_completion(self.orchestrate_async(&context))?
    }

    pub async fn orchestrate_async(
        &self,
        context: &RequestContext,
    ) -> Result<ValidatedResult, OrchestrationError> {
        let mode = context.mode();

        // Fail before doing any work when no remote call could be made.
        self.client.credential()?;

        let prompt = build_prompt(mode, context.fields())?;
        let outcome = self
            .client
            .complete(context.persona(), &prompt, mode.schema())
            .await;

        match &outcome {
            Ok(_) => info!("Orchestration succeeded: mode={mode}"),
            Err(e) => warn!("Orchestration failed: mode={mode}, kind={:?}", e.kind()),
        }

        outcome
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

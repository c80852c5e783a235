use crate::config::Config;
use crate::orchestration::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the session credential; read-only for the life of the process.
    pub orchestrator: Orchestrator,
    pub config: Config,
}

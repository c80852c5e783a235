pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::orchestration::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Orchestration API
        .route("/api/v1/modes", get(handlers::handle_list_modes))
        .route(
            "/api/v1/orchestrate/:mode",
            post(handlers::handle_orchestrate),
        )
        .route("/api/v1/render/:mode", post(handlers::handle_render))
        .fallback(handlers::handle_not_found)
        .with_state(state)
}

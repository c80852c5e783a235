//! Axum route handlers for the Orchestration API.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::errors::{status_for, AppError};
use crate::orchestration::builder::{required_inputs, InputField};
use crate::orchestration::{OrchestrationError, RequestContext};
use crate::render::{render_error, render_result};
use crate::schema::{Mode, ValidatedResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OrchestrateRequest {
    /// Falls back to the configured default persona when absent.
    #[serde(default)]
    pub system_persona: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct OrchestrateResponse {
    pub request_id: Uuid,
    pub mode: Mode,
    pub result: ValidatedResult,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ModeDescriptor {
    pub mode: Mode,
    pub inputs: &'static [InputField],
    pub output_schema: Value,
}

#[derive(Debug, Serialize)]
pub struct ModesResponse {
    pub credential_configured: bool,
    pub modes: Vec<ModeDescriptor>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/modes
///
/// Lists every mode with its required inputs and output JSON schema.
pub async fn handle_list_modes(State(state): State<AppState>) -> Json<ModesResponse> {
    let modes = Mode::ALL
        .into_iter()
        .map(|mode| ModeDescriptor {
            mode,
            inputs: required_inputs(mode),
            output_schema: mode.schema().json_schema(),
        })
        .collect();

    Json(ModesResponse {
        credential_configured: state.orchestrator.has_credential(),
        modes,
    })
}

/// POST /api/v1/orchestrate/:mode
///
/// Runs one structured completion and returns the validated record as JSON.
pub async fn handle_orchestrate(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    Json(request): Json<OrchestrateRequest>,
) -> Result<Json<OrchestrateResponse>, AppError> {
    let mode = parse_mode(&mode)?;
    let request_id = Uuid::new_v4();

    let result = run(&state, mode, request_id, request).await?;

    Ok(Json(OrchestrateResponse {
        request_id,
        mode,
        result,
        generated_at: Utc::now(),
    }))
}

/// POST /api/v1/render/:mode
///
/// Same call as `/orchestrate`, answered with an HTML card. Failures, an
/// unknown mode included, render the kind-specific error card with the
/// matching status code.
pub async fn handle_render(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    Json(request): Json<OrchestrateRequest>,
) -> Response {
    let outcome = match parse_mode(&mode) {
        Ok(mode) => run(&state, mode, Uuid::new_v4(), request).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => Html(render_result(&result)).into_response(),
        Err(e) => {
            let (status, _) = status_for(e.kind());
            (status, Html(render_error(&e))).into_response()
        }
    }
}

fn parse_mode(raw: &str) -> Result<Mode, OrchestrationError> {
    raw.parse::<Mode>()
        .map_err(|e| OrchestrationError::InvalidRequest(e.to_string()))
}

async fn run(
    state: &AppState,
    mode: Mode,
    request_id: Uuid,
    request: OrchestrateRequest,
) -> Result<ValidatedResult, OrchestrationError> {
    let persona = request
        .system_persona
        .unwrap_or_else(|| state.config.default_persona.clone());
    let context = RequestContext::new(mode, persona, request.fields);

    let span = tracing::info_span!("orchestrate", %request_id, %mode);
    async {
        info!("Dispatching {} request", mode);
        state.orchestrator.orchestrate_async(&context).await
    }
    .instrument(span)
    .await
}

/// Fallback for unknown routes, in the same error envelope as everything else.
pub async fn handle_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": { "code": "NOT_FOUND", "message": "No such route" }
        })),
    )
}

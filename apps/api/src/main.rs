use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storeassist::config::Config;
use storeassist::llm_client::{self, OpenAiBackend};
use storeassist::orchestration::client::CompletionClient;
use storeassist::orchestration::Orchestrator;
use storeassist::routes::build_router;
use storeassist::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting storeassist v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the model backend and the orchestration layer on top of it
    let backend = OpenAiBackend::new(&config.openai_base_url)?;
    info!(
        "LLM backend initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout.as_secs()
    );

    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; orchestration calls will fail with MissingCredential");
    }

    let client = CompletionClient::new(
        Arc::new(backend),
        config.openai_api_key.clone(),
        config.llm_timeout,
    );

    let state = AppState {
        orchestrator: Orchestrator::new(client),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the storefront domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

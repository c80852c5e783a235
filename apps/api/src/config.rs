use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{Credential, DEFAULT_BASE_URL};

/// Persona used when a request does not supply one.
pub const DEFAULT_PERSONA: &str = "You are an in-store assistant. \
    Be concise, neutral, and practical. Avoid exaggerated marketing.";

/// Application configuration loaded from environment variables.
///
/// The API key is optional at start-up: without it every orchestration call
/// fails fast with `MissingCredential` instead of the process refusing to boot.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<Credential>,
    pub openai_base_url: String,
    pub llm_timeout: Duration,
    pub default_persona: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .and_then(Credential::new),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(
                std::env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            default_persona: std::env::var("DEFAULT_PERSONA")
                .unwrap_or_else(|_| DEFAULT_PERSONA.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

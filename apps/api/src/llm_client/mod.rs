//! LLM Client — the single point of entry for all model API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the model API directly.
//! All remote completions go through a `CompletionBackend`.
//!
//! Model: gpt-4o-mini (hardcoded — do not make configurable to prevent drift)

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::schema::OutputSchema;

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// The model used for all completions.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed completion: {0}")]
    Malformed(String),
}

/// API key for the remote backend. Set once per session, read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for a blank key so that "unset" and "empty" behave the same.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// One logical request: persona as the standing instruction, the task prompt
/// as the user turn, the schema as the output contract.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub credential: &'a Credential,
    pub system: &'a str,
    pub prompt: &'a str,
    pub schema: &'a OutputSchema,
}

/// Remote model seam. Returns the raw decoded JSON object; the caller is
/// responsible for validating it against `request.schema`.
///
/// Implementations must perform exactly one round trip and never retry.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Value, BackendError>;
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI Chat Completions backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    response_format: Value,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    pub refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Production backend: OpenAI Chat Completions with `json_schema` structured output.
#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
}

impl OpenAiBackend {
    /// No request deadline is set here: `CompletionClient` owns the only
    /// timeout so an expired call is always classified as `Timeout`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        Ok(Self {
            // Sync callers get a fresh runtime per call; pooled connections
            // must not outlive the runtime that opened them.
            client: Client::builder().pool_max_idle_per_host(0).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Value, BackendError> {
        let system = prompts::with_json_contract(request.system);
        let body = ChatRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            response_format: response_format(request.schema),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(request.credential.expose())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "Completion succeeded: schema={}, prompt_tokens={}, completion_tokens={}",
                request.schema.name, usage.prompt_tokens, usage.completion_tokens
            );
        }

        parse_completion(chat)
    }
}

/// Builds the `response_format` block for a schema.
fn response_format(schema: &OutputSchema) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": schema.name,
            "strict": true,
            "schema": schema.json_schema()
        }
    })
}

/// Extracts and decodes the JSON object from the first choice.
fn parse_completion(chat: ChatResponse) -> Result<Value, BackendError> {
    let message = chat
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| BackendError::Malformed("response contained no choices".to_string()))?;

    if let Some(refusal) = message.refusal {
        return Err(BackendError::Malformed(format!("model refused: {refusal}")));
    }

    let text = message
        .content
        .ok_or_else(|| BackendError::Malformed("response content was empty".to_string()))?;

    serde_json::from_str(strip_json_fences(&text))
        .map_err(|e| BackendError::Malformed(format!("content is not valid JSON: {e}")))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

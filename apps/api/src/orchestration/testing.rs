//! In-memory backends and fixtures shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm_client::{BackendError, CompletionBackend, CompletionRequest, Credential};
use crate::orchestration::client::CompletionClient;
use crate::orchestration::Orchestrator;

/// What the mock saw on its most recent call.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub credential: String,
    pub system: String,
    pub prompt: String,
    pub schema: &'static str,
}

enum Reply {
    Value(Value),
    Error(Box<dyn Fn() -> BackendError + Send + Sync>),
}

/// Deterministic backend: always returns the same reply and counts calls.
pub struct MockBackend {
    reply: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last: Mutex<Option<SeenRequest>>,
}

impl MockBackend {
    pub fn returning(value: Value) -> Self {
        Self::with_reply(Reply::Value(value))
    }

    pub fn failing(error: impl Fn() -> BackendError + Send + Sync + 'static) -> Self {
        Self::with_reply(Reply::Error(Box::new(error)))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SeenRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Value, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(SeenRequest {
            credential: request.credential.expose().to_string(),
            system: request.system.to_string(),
            prompt: request.prompt.to_string(),
            schema: request.schema.name,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Value(value) => Ok(value.clone()),
            Reply::Error(make) => Err(make()),
        }
    }
}

pub fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn orchestrator(backend: &Arc<MockBackend>, key: Option<&str>) -> Orchestrator {
    Orchestrator::new(CompletionClient::new(
        backend.clone(),
        key.and_then(Credential::new),
        Duration::from_secs(5),
    ))
}

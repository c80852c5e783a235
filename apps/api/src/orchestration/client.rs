//! Completion Client — the single choke point between orchestration and the
//! remote model. One backend round trip per call, bounded by a timeout, with
//! the raw response always re-validated locally.

use std::sync::Arc;
use std::time::Duration;

use crate::llm_client::{CompletionBackend, CompletionRequest, Credential};
use crate::orchestration::OrchestrationError;
use crate::schema::{OutputSchema, ValidatedResult};

#[derive(Clone)]
pub struct CompletionClient {
    backend: Arc<dyn CompletionBackend>,
    credential: Option<Credential>,
    timeout: Duration,
}

impl CompletionClient {
    /// The credential is fixed for the lifetime of the client.
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        credential: Option<Credential>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            credential,
            timeout,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn credential(&self) -> Result<&Credential, OrchestrationError> {
        self.credential
            .as_ref()
            .ok_or(OrchestrationError::MissingCredential)
    }

    /// Sends (persona, prompt, schema) to the backend and validates the reply.
    ///
    /// Never retries. A response that breaks the schema is `SchemaViolation`;
    /// no partially valid record is ever returned.
    pub async fn complete(
        &self,
        persona: &str,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<ValidatedResult, OrchestrationError> {
        let credential = self.credential()?;

        let request = CompletionRequest {
            credential,
            system: persona,
            prompt,
            schema,
        };

        let raw = tokio::time::timeout(self.timeout, self.backend.complete(request))
            .await
            .map_err(|_| OrchestrationError::Timeout(self.timeout))??;

        Ok(schema.validate(&raw)?)
    }
}

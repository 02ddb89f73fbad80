//! Boundary to the external reasoning service that reads drawings.
//!
//! Everything model-specific lives behind [`ReasoningService`]; the rest of
//! the server only sees [`Interpreter::interpret`], which returns parsed
//! [`AnalysisResult`]s or an [`InterpretError`] saying which side failed.

pub mod gemini;
pub mod parse;
pub mod prompt;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use canvas_core::{AnalysisResult, DataUrl, VariableContext};
use thiserror::Error;

use crate::metrics;

pub use gemini::{GeminiClient, GeminiConfig};
pub use parse::{parse_reply, strip_code_fences, ReplyParseError};
pub use prompt::build_prompt;

/// Failures talking to a reasoning service.
#[derive(Debug, Error)]
pub enum ReasoningError {
    /// Transport failed (connection, timeout, body read).
    #[error("reasoning service request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("reasoning service returned {status}: {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the service.
        message: String,
    },
    /// The service answered without any text.
    #[error("reasoning service returned no text")]
    EmptyReply,
    /// The service envelope could not be decoded.
    #[error("failed to decode reasoning service response: {0}")]
    Json(#[from] serde_json::Error),
    /// The service is misconfigured or refused to run.
    #[error("reasoning service unavailable: {0}")]
    Unavailable(String),
}

impl ReasoningError {
    /// Returns true for transient failures a later submission may get past.
    /// Decides the log level of failed calls.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// An external model that reads an image given an instruction prompt.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Short name used in logs and metrics.
    fn name(&self) -> &str;

    /// Send `prompt` and `image`, returning the model's raw text reply.
    async fn complete(&self, prompt: &str, image: &DataUrl) -> Result<String, ReasoningError>;
}

/// Why a drawing could not be interpreted.
#[derive(Debug, Error)]
pub enum InterpretError {
    /// The service call itself failed.
    #[error(transparent)]
    Service(#[from] ReasoningError),
    /// The service replied, but not with a result list.
    #[error(transparent)]
    Parse(#[from] ReplyParseError),
}

/// Prompts a [`ReasoningService`] and parses its reply.
#[derive(Clone)]
pub struct Interpreter {
    service: Arc<dyn ReasoningService>,
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("service", &self.service.name())
            .finish()
    }
}

impl Interpreter {
    /// Wrap a reasoning service.
    pub fn new(service: Arc<dyn ReasoningService>) -> Self {
        Self { service }
    }

    /// Name of the wrapped service.
    #[must_use]
    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    /// Interpret a drawing in the context of previously assigned variables.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError::Service`] if the call fails and
    /// [`InterpretError::Parse`] if the reply is not a non-empty result list.
    #[tracing::instrument(name = "interpret", skip_all, fields(service = self.service.name()))]
    pub async fn interpret(
        &self,
        image: &DataUrl,
        variables: &VariableContext,
    ) -> Result<Vec<AnalysisResult>, InterpretError> {
        let prompt = build_prompt(variables);
        let started = Instant::now();
        let reply = self.service.complete(&prompt, image).await;
        let elapsed = started.elapsed().as_secs_f64();

        let text = match reply {
            Ok(text) => text,
            Err(err) => {
                metrics::record_reasoning_call(self.service.name(), "service_failure", elapsed);
                if err.is_retryable() {
                    tracing::warn!(error = %err, "Reasoning service call failed, retry may succeed");
                } else {
                    tracing::error!(error = %err, "Reasoning service call failed");
                }
                return Err(err.into());
            }
        };

        match parse_reply(&text) {
            Ok(results) => {
                metrics::record_reasoning_call(self.service.name(), "ok", elapsed);
                tracing::debug!(count = results.len(), "Reasoning reply parsed");
                Ok(results)
            }
            Err(err) => {
                metrics::record_reasoning_call(self.service.name(), "parse_failure", elapsed);
                tracing::warn!(error = %err, reply_len = text.len(), "Reasoning reply unparsable");
                Err(err.into())
            }
        }
    }
}

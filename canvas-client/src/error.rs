//! Submit client error types.

use canvas_core::{CanvasError, ErrorKind};
use thiserror::Error;

/// Errors that can occur while submitting a drawing.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A previous submission has not resolved yet. No request was sent.
    #[error("a submission is already in progress")]
    SubmitInProgress,

    /// The endpoint URL provided by configuration is invalid.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// The surface could not be captured.
    #[error("failed to capture drawing: {0}")]
    Capture(#[from] CanvasError),

    /// HTTP layer failed (connection, timeout, etc.).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status}: {message}")]
    Endpoint {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the status reason.
        message: String,
        /// Failure category reported by the endpoint.
        kind: Option<ErrorKind>,
    },

    /// A success status carried a body that is not JSON.
    #[error("endpoint reply is not JSON: {0}")]
    InvalidReply(#[source] serde_json::Error),
}

impl SubmitError {
    /// Returns true if retrying the same drawing later could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Endpoint { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

//! HTTP error responses for the analysis endpoint.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use canvas_core::{ErrorKind, ErrorResponse};
use thiserror::Error;

use crate::reasoning::{InterpretError, ReasoningError, ReplyParseError};
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Every way `POST /save-image` can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body missing or invalid.
    #[error("Invalid request body: {0}")]
    MalformedPayload(String),
    /// Request body over the configured ceiling.
    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),
    /// The image could not be written to disk.
    #[error("Failed to save image: {0}")]
    StorageFailure(#[from] StorageError),
    /// The reasoning service failed.
    #[error("Reasoning service failed: {0}")]
    ReasoningServiceFailure(#[from] ReasoningError),
    /// The reasoning service reply was not a result list.
    #[error("Could not parse reasoning service reply: {0}")]
    ReasoningParseFailure(#[from] ReplyParseError),
}

impl ApiError {
    /// Failure category sent in the body.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedPayload(_) => ErrorKind::MalformedPayload,
            Self::PayloadTooLarge(_) => ErrorKind::PayloadTooLarge,
            Self::StorageFailure(_) => ErrorKind::StorageFailure,
            Self::ReasoningServiceFailure(_) => ErrorKind::ReasoningServiceFailure,
            Self::ReasoningParseFailure(_) => ErrorKind::ReasoningParseFailure,
        }
    }

    /// Metric label for this failure.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MalformedPayload => "malformed_payload",
            ErrorKind::PayloadTooLarge => "payload_too_large",
            ErrorKind::StorageFailure => "storage_failure",
            ErrorKind::ReasoningServiceFailure => "reasoning_service_failure",
            ErrorKind::ReasoningParseFailure => "reasoning_parse_failure",
        }
    }

    /// HTTP status for this failure.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::MalformedPayload(_) => "Invalid request body",
            Self::PayloadTooLarge(_) => "Request body too large",
            Self::StorageFailure(_) => "Failed to save image",
            Self::ReasoningServiceFailure(_) => "Reasoning service failed",
            Self::ReasoningParseFailure(_) => "Could not parse reasoning service reply",
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::MalformedPayload(detail) | Self::PayloadTooLarge(detail) => detail.clone(),
            Self::StorageFailure(err) => err.to_string(),
            Self::ReasoningServiceFailure(err) => err.to_string(),
            Self::ReasoningParseFailure(err) => err.to_string(),
        }
    }

    /// The JSON body sent to the client.
    #[must_use]
    pub fn body(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.message().to_string(),
            error: Some(self.detail()),
            kind: Some(self.kind()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(rejection.body_text())
        } else {
            Self::MalformedPayload(rejection.body_text())
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

impl From<InterpretError> for ApiError {
    fn from(err: InterpretError) -> Self {
        match err {
            InterpretError::Service(e) => Self::ReasoningServiceFailure(e),
            InterpretError::Parse(e) => Self::ReasoningParseFailure(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.label(), error = %self, "Request failed");
        } else {
            tracing::warn!(kind = self.label(), error = %self, "Request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

//! JSON bodies exchanged between the submit client and the analysis endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::variables::VariableContext;

/// Path of the analysis endpoint.
pub const SAVE_IMAGE_PATH: &str = "/save-image";

/// Body of `POST /save-image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveImageRequest {
    /// Image as a base64 data URL.
    pub image: String,
    /// Variables assigned in earlier submissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<VariableContext>,
}

/// The evaluated value of an expression: either a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    /// Numeric result.
    Number(serde_json::Number),
    /// Textual result (symbolic answers, descriptions).
    Text(String),
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<ResultValue> for serde_json::Value {
    fn from(value: ResultValue) -> Self {
        match value {
            ResultValue::Number(n) => Self::Number(n),
            ResultValue::Text(s) => Self::String(s),
        }
    }
}

/// One interpretation of what was drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The expression as read from the drawing.
    #[serde(alias = "expression")]
    pub expr: String,
    /// Its evaluated value.
    pub result: ResultValue,
    /// Whether the drawing assigned `result` to the variable named by `expr`.
    #[serde(default, alias = "isAssignment")]
    pub assign: bool,
}

impl AnalysisResult {
    /// Text shown over the canvas: `"{expr}={result}"`.
    #[must_use]
    pub fn overlay_text(&self) -> String {
        format!("{}={}", self.expr, self.result)
    }
}

/// Reply of the save-only endpoint revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedImage {
    /// Human readable status.
    pub message: String,
    /// Where the image was written, relative to the server.
    pub file_path: String,
}

/// A successful `POST /save-image` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SaveImageReply {
    /// The drawing was analysed.
    Analysis(AnalysisResult),
    /// The drawing was only stored.
    Saved(SavedImage),
}

/// Machine readable category of an endpoint failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Request body missing or invalid.
    MalformedPayload,
    /// Request body over the size ceiling.
    PayloadTooLarge,
    /// The image could not be written to disk.
    StorageFailure,
    /// The reasoning service could not be reached or returned an error.
    ReasoningServiceFailure,
    /// The reasoning service replied with something that is not a result list.
    ReasoningParseFailure,
}

/// Body of every endpoint error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable summary.
    pub message: String,
    /// Underlying error detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

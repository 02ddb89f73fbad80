//! Turning free-form model replies into [`AnalysisResult`] lists.

use canvas_core::AnalysisResult;
use serde::Deserialize;
use thiserror::Error;

/// Why a model reply could not be turned into results.
#[derive(Debug, Error)]
pub enum ReplyParseError {
    /// The text is not JSON.
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    /// The JSON does not have the `{expr, result, assign}` shape.
    #[error("reply has an unexpected shape: {0}")]
    UnexpectedShape(#[source] serde_json::Error),
    /// The reply is an empty list.
    #[error("reply contains no results")]
    Empty,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<AnalysisResult>),
    One(AnalysisResult),
}

/// Remove a surrounding Markdown code fence, if any.
///
/// Models often wrap JSON in ```` ```json ... ``` ````. Only the first fenced
/// block is kept; its optional language tag and any text around it are dropped.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after_open = &trimmed[start + 3..];
    let body = match after_open.find("```") {
        Some(end) => &after_open[..end],
        None => after_open,
    };
    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    body.trim().trim_matches('`').trim()
}

/// Parse a model reply into one or more results.
///
/// Accepts a JSON array of results or a single result object, optionally
/// wrapped in a code fence.
///
/// # Errors
///
/// Returns a [`ReplyParseError`] if the text is not JSON, has the wrong
/// shape, or is an empty list.
pub fn parse_reply(text: &str) -> Result<Vec<AnalysisResult>, ReplyParseError> {
    let body = strip_code_fences(text);
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(ReplyParseError::InvalidJson)?;
    let results = match serde_json::from_value(value).map_err(ReplyParseError::UnexpectedShape)? {
        OneOrMany::Many(results) => results,
        OneOrMany::One(result) => vec![result],
    };
    if results.is_empty() {
        return Err(ReplyParseError::Empty);
    }
    Ok(results)
}

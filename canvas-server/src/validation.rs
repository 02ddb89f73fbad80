//! Input validation for untrusted data.
//!
//! All user-supplied input MUST be validated before use.
//! This module provides validators for the `/save-image` request body.

use canvas_core::{CanvasError, DataUrl, VariableContext};
pub use canvas_core::MAX_VARIABLE_NAME_LEN;
use thiserror::Error;

/// Default ceiling for request bodies.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024; // 10MB
/// Maximum number of variables sent with one drawing.
pub const MAX_VARIABLES: usize = 256;

/// Validation error types.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The image field is empty.
    #[error("image is required")]
    MissingImage,
    /// The image field is not a usable data URL.
    #[error("invalid image: {0}")]
    InvalidImage(#[from] CanvasError),
    /// Too many variables.
    #[error("too many variables (max {MAX_VARIABLES})")]
    TooManyVariables,
    /// Variable name exceeds maximum length.
    #[error("variable name too long (max {MAX_VARIABLE_NAME_LEN} chars)")]
    VariableNameTooLong,
    /// Variable name is empty or contains invalid characters.
    #[error("variable name '{0}' contains invalid characters")]
    VariableNameInvalidChars(String),
}

/// Decode and validate the `image` data URL.
///
/// # Errors
///
/// Returns [`ValidationError::MissingImage`] for an empty string and
/// [`ValidationError::InvalidImage`] when the data URL is malformed.
pub fn decode_image(image: &str) -> Result<DataUrl, ValidationError> {
    if image.trim().is_empty() {
        return Err(ValidationError::MissingImage);
    }
    Ok(DataUrl::parse(image)?)
}

/// Validate a variable name.
///
/// Valid names:
/// - 1-64 characters
/// - Alphanumeric, underscore, or any non-ASCII letter (handwritten Greek
///   letters are common)
///
/// # Errors
///
/// Returns [`ValidationError::VariableNameTooLong`] if the name exceeds 64 characters.
/// Returns [`ValidationError::VariableNameInvalidChars`] if the name is empty or contains invalid characters.
pub fn validate_variable_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() > MAX_VARIABLE_NAME_LEN {
        return Err(ValidationError::VariableNameTooLong);
    }
    if !VariableContext::is_valid_name(name) {
        return Err(ValidationError::VariableNameInvalidChars(name.to_string()));
    }
    Ok(())
}

/// Validate the variable context sent with a drawing.
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate_variables(variables: &VariableContext) -> Result<(), ValidationError> {
    if variables.len() > MAX_VARIABLES {
        return Err(ValidationError::TooManyVariables);
    }
    for (name, _) in variables.iter() {
        validate_variable_name(name)?;
    }
    Ok(())
}

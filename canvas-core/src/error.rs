//! Error types for canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Raster dimensions were zero or too large to allocate.
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A data URL was malformed or carried an unsupported payload.
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// The raster could not be encoded.
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

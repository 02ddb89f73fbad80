//! Raster snapshots and the data URL encoding used to ship them.
//!
//! Supports `data:<mime>;base64,<payload>` URLs carrying PNG, JPEG or WebP.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};
use crate::raster::Raster;

/// Image formats accepted in a data URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG (lossless, what the surface exports).
    Png,
    /// JPEG.
    Jpeg,
    /// WebP.
    WebP,
}

impl ImageFormat {
    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }
        None
    }

    /// Canonical MIME type.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }
}

/// An immutable PNG snapshot of a raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    png: Vec<u8>,
    width: u32,
    height: u32,
    captured_at_ms: u64,
}

impl ExportPayload {
    /// Capture the current contents of `raster`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Encode`] if PNG encoding fails.
    pub fn capture(raster: &Raster) -> CanvasResult<Self> {
        Ok(Self {
            png: raster.encode_png()?,
            width: raster.width(),
            height: raster.height(),
            captured_at_ms: current_timestamp_ms(),
        })
    }

    /// Encoded PNG bytes.
    #[must_use]
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Width of the captured raster.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the captured raster.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Capture time in milliseconds since the Unix epoch.
    #[must_use]
    pub fn captured_at_ms(&self) -> u64 {
        self.captured_at_ms
    }

    /// Render as `data:image/png;base64,...`.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        encode_data_url(ImageFormat::Png, &self.png)
    }
}

/// A decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Format declared by the MIME type and confirmed by magic bytes.
    pub format: ImageFormat,
    /// Decoded image bytes.
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// Parse a base64 image data URL.
    ///
    /// The MIME type must name a supported image format and the decoded bytes
    /// must carry that format's signature.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDataUrl`] describing the first problem found.
    pub fn parse(uri: &str) -> CanvasResult<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| CanvasError::InvalidDataUrl("not a data URL".to_string()))?;

        let (metadata, encoded) = rest
            .split_once(',')
            .ok_or_else(|| CanvasError::InvalidDataUrl("missing comma".to_string()))?;

        let mut params = metadata.split(';');
        let mime = params.next().unwrap_or_default();
        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(CanvasError::InvalidDataUrl(
                "payload is not base64 encoded".to_string(),
            ));
        }

        let format = ImageFormat::from_mime(mime).ok_or_else(|| {
            CanvasError::InvalidDataUrl(format!("unsupported media type '{mime}'"))
        })?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| CanvasError::InvalidDataUrl(format!("failed to decode base64: {e}")))?;

        if bytes.is_empty() {
            return Err(CanvasError::InvalidDataUrl("empty payload".to_string()));
        }
        if ImageFormat::from_magic_bytes(&bytes) != Some(format) {
            return Err(CanvasError::InvalidDataUrl(format!(
                "payload is not a valid {} image",
                format.extension()
            )));
        }

        Ok(Self { format, bytes })
    }

    /// Base64 of the decoded bytes (no `data:` prefix).
    #[must_use]
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Build a base64 data URL for `bytes`.
#[must_use]
pub fn encode_data_url(format: ImageFormat, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{encoded}", format.mime())
}

/// Milliseconds since the Unix epoch, saturating at `u64::MAX`.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

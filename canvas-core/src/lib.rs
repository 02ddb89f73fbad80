//! # Sketch Calc Core
//!
//! Drawing logic shared by the submit client and the analysis endpoint.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 canvas-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Drawing Surface   │  Export                │
//! │  - Pointer input   │  - PNG snapshot        │
//! │  - Stroke styles   │  - Data URL codec      │
//! │  - Eraser / reset  │                        │
//! ├─────────────────────────────────────────────┤
//! │  Raster (tiny-skia) │  Protocol             │
//! │  - Round caps/joins │  - Request / reply    │
//! │  - Background fill  │  - Variable context   │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod error;
pub mod event;
pub mod export;
pub mod protocol;
pub mod raster;
pub mod style;
pub mod surface;
pub mod variables;

pub use color::{Rgba, BACKGROUND, PALETTE};
pub use error::{CanvasError, CanvasResult};
pub use event::{Point, PointerEvent, PointerPhase};
pub use export::{current_timestamp_ms, encode_data_url, DataUrl, ExportPayload, ImageFormat};
pub use protocol::{
    AnalysisResult, ErrorKind, ErrorResponse, ResultValue, SaveImageReply, SaveImageRequest,
    SavedImage, SAVE_IMAGE_PATH,
};
pub use raster::Raster;
pub use style::{StrokeStyle, DEFAULT_STROKE_WIDTH, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};
pub use surface::DrawingSurface;
pub use variables::{VariableContext, MAX_VARIABLE_NAME_LEN};

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

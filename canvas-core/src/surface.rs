//! The freehand drawing surface.
//!
//! A [`DrawingSurface`] owns a [`Raster`] and turns pointer input into
//! stroke segments that are committed to the raster immediately. Strokes are
//! not retained and there is no undo history.
//!
//! The eraser is drawing with the background color, not alpha removal: erased
//! pixels become background and nothing beneath them is revealed.

use crate::color::{Rgba, BACKGROUND};
use crate::error::CanvasResult;
use crate::event::{Point, PointerEvent, PointerPhase};
use crate::export::ExportPayload;
use crate::raster::Raster;
use crate::style::{clamp_width, StrokeStyle};

/// The complete state of one drawing surface.
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    raster: Raster,
    style: StrokeStyle,
    /// Last point of the active stroke; `None` while not drawing.
    last_point: Option<Point>,
    overlay: Option<String>,
}

impl DrawingSurface {
    /// Create a surface of the given size, filled with the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or too large.
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        Ok(Self {
            raster: Raster::new(width, height, BACKGROUND)?,
            style: StrokeStyle::default(),
            last_point: None,
            overlay: None,
        })
    }

    /// Start a stroke at `point`. Nothing is drawn until the stroke is extended.
    pub fn begin_stroke(&mut self, point: Point) {
        tracing::debug!(x = point.x, y = point.y, "stroke begin");
        self.last_point = Some(point);
    }

    /// Draw a segment from the previous point to `point` using the current style.
    ///
    /// Does nothing when no stroke is active.
    pub fn extend_stroke(&mut self, point: Point) {
        let Some(from) = self.last_point else {
            return;
        };
        self.raster.stroke_segment(from, point, &self.style);
        self.last_point = Some(point);
    }

    /// Finish the active stroke, if any.
    pub fn end_stroke(&mut self) {
        if self.last_point.take().is_some() {
            tracing::debug!("stroke end");
        }
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.last_point.is_some()
    }

    /// Route a pointer event to the stroke operations.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        match event.phase {
            PointerPhase::Down => self.begin_stroke(event.position),
            PointerPhase::Move => self.extend_stroke(event.position),
            PointerPhase::Up | PointerPhase::Leave => self.end_stroke(),
        }
    }

    /// The style used for subsequent segments.
    #[must_use]
    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Replace the style. Already drawn pixels are unaffected.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style.normalized();
    }

    /// Pick a pen color; this turns the eraser off.
    pub fn select_color(&mut self, color: Rgba) {
        self.style.color = color;
        self.style.eraser = false;
    }

    /// Set the line width, clamped to the selectable range.
    pub fn set_width(&mut self, width: f32) {
        self.style.width = clamp_width(width);
    }

    /// Switch the eraser on or off.
    pub fn set_eraser(&mut self, on: bool) {
        self.style.eraser = on;
    }

    /// Flip the eraser and return its new state.
    pub fn toggle_eraser(&mut self) -> bool {
        self.style.eraser = !self.style.eraser;
        self.style.eraser
    }

    /// Clear the raster to the background and drop the overlay.
    pub fn reset(&mut self) {
        self.raster.clear();
        self.overlay = None;
        tracing::debug!("surface reset");
    }

    /// Reallocate the raster for a new viewport size.
    ///
    /// Prior drawing content is lost and the overlay is cleared, exactly as
    /// after [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// Returns an error if the new dimensions are invalid; the surface is left
    /// unchanged in that case.
    pub fn resize(&mut self, width: u32, height: u32) -> CanvasResult<()> {
        self.raster = Raster::new(width, height, BACKGROUND)?;
        self.overlay = None;
        self.last_point = None;
        tracing::debug!(width, height, "surface resized");
        Ok(())
    }

    /// Show a result over the drawing.
    pub fn show_overlay(&mut self, text: impl Into<String>) {
        self.overlay = Some(text.into());
    }

    /// The text currently shown over the drawing.
    #[must_use]
    pub fn overlay(&self) -> Option<&str> {
        self.overlay.as_deref()
    }

    /// Read access to the raster.
    #[must_use]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Read a pixel as a straight color.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.raster.pixel(x, y)
    }

    /// Whether the raster holds nothing but background.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.raster.is_blank()
    }

    /// Snapshot the raster for submission.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn export(&self) -> CanvasResult<ExportPayload> {
        ExportPayload::capture(&self.raster)
    }
}

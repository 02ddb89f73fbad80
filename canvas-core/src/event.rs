//! Pointer input for the drawing surface.

use serde::{Deserialize, Serialize};

/// A position in raster pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (0 = left edge).
    pub x: f32,
    /// Y coordinate (0 = top edge).
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved (pressed or not).
    Move,
    /// Button released.
    Up,
    /// Pointer left the surface.
    Leave,
}

/// A pointer (mouse, pen or primary touch) event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// Position relative to the surface's top-left corner.
    pub position: Point,
}

impl PointerEvent {
    /// Create a pointer event.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
        }
    }

    /// Pointer pressed at `(x, y)`.
    #[must_use]
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Down, x, y)
    }

    /// Pointer moved to `(x, y)`.
    #[must_use]
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    /// Pointer released at `(x, y)`.
    #[must_use]
    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Up, x, y)
    }

    /// Translate a viewport position into surface coordinates given the
    /// surface's top-left offset in the viewport.
    #[must_use]
    pub fn relative_to(self, origin: Point) -> Self {
        Self {
            position: Point::new(self.position.x - origin.x, self.position.y - origin.y),
            ..self
        }
    }
}

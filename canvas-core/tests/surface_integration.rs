//! Drawing Surface Integration Tests
//!
//! Tests the complete drawing flow including:
//! - Pointer-driven strokes
//! - Mid-stroke style changes
//! - Eraser behaviour
//! - Reset and resize clearing
//! - PNG export fidelity

use canvas_core::{
    DataUrl, DrawingSurface, Point, PointerEvent, Rgba, StrokeStyle, BACKGROUND,
};
use proptest::prelude::*;

const RED: Rgba = Rgba::opaque(255, 0, 0);

fn close_to(actual: Rgba, expected: Rgba, tolerance: u8) -> bool {
    actual.r.abs_diff(expected.r) <= tolerance
        && actual.g.abs_diff(expected.g) <= tolerance
        && actual.b.abs_diff(expected.b) <= tolerance
        && actual.a.abs_diff(expected.a) <= tolerance
}

fn background_pixel() -> Rgba {
    DrawingSurface::new(1, 1)
        .expect("surface")
        .pixel(0, 0)
        .expect("pixel")
}

// ============================================================================
// Stroke Workflow Tests
// ============================================================================

#[test]
fn test_pointer_sequence_draws_segment() {
    let mut surface = DrawingSurface::new(100, 40).expect("surface");

    surface.handle_pointer(&PointerEvent::down(10.0, 20.0));
    surface.handle_pointer(&PointerEvent::moved(90.0, 20.0));
    surface.handle_pointer(&PointerEvent::up(90.0, 20.0));

    assert_eq!(surface.pixel(50, 20), Some(Rgba::WHITE));
    assert_eq!(surface.pixel(50, 35), Some(background_pixel()));
    assert!(!surface.is_drawing());
}

#[test]
fn test_moves_after_release_do_not_draw() {
    let mut surface = DrawingSurface::new(100, 40).expect("surface");

    surface.handle_pointer(&PointerEvent::down(10.0, 10.0));
    surface.handle_pointer(&PointerEvent::up(10.0, 10.0));
    surface.handle_pointer(&PointerEvent::moved(90.0, 30.0));

    assert!(surface.is_blank());
}

#[test]
fn test_style_change_mid_stroke_applies_forward() {
    let mut surface = DrawingSurface::new(100, 40).expect("surface");
    surface.set_width(4.0);

    surface.begin_stroke(Point::new(5.0, 20.0));
    surface.extend_stroke(Point::new(45.0, 20.0));
    surface.select_color(RED);
    surface.extend_stroke(Point::new(95.0, 20.0));
    surface.end_stroke();

    assert_eq!(surface.pixel(25, 20), Some(Rgba::WHITE));
    assert_eq!(surface.pixel(70, 20), Some(RED));
}

#[test]
fn test_style_change_leaves_existing_pixels() {
    let mut surface = DrawingSurface::new(60, 20).expect("surface");

    surface.begin_stroke(Point::new(5.0, 10.0));
    surface.extend_stroke(Point::new(55.0, 10.0));
    surface.end_stroke();
    surface.set_style(StrokeStyle::pen(RED, 12.0));

    assert_eq!(surface.pixel(30, 10), Some(Rgba::WHITE));
}

#[test]
fn test_eraser_restores_background_look() {
    let mut surface = DrawingSurface::new(80, 40).expect("surface");
    surface.set_width(6.0);
    surface.begin_stroke(Point::new(10.0, 20.0));
    surface.extend_stroke(Point::new(70.0, 20.0));
    surface.end_stroke();
    assert_eq!(surface.pixel(40, 20), Some(Rgba::WHITE));

    surface.set_style(StrokeStyle::eraser(20.0));
    surface.begin_stroke(Point::new(10.0, 20.0));
    surface.extend_stroke(Point::new(70.0, 20.0));
    surface.end_stroke();

    let erased = surface.pixel(40, 20).expect("pixel");
    assert!(
        close_to(erased, background_pixel(), 2),
        "erased pixel {erased:?} should match background"
    );
}

#[test]
fn test_reset_after_drawing_is_blank() {
    let mut surface = DrawingSurface::new(50, 50).expect("surface");
    surface.select_color(RED);
    surface.begin_stroke(Point::new(0.0, 0.0));
    surface.extend_stroke(Point::new(49.0, 49.0));
    surface.end_stroke();
    surface.show_overlay("2+2=4");
    assert!(!surface.is_blank());

    surface.reset();

    assert!(surface.is_blank());
    assert_eq!(surface.overlay(), None);
}

#[test]
fn test_resize_discards_drawing() {
    let mut surface = DrawingSurface::new(50, 50).expect("surface");
    surface.begin_stroke(Point::new(0.0, 25.0));
    surface.extend_stroke(Point::new(49.0, 25.0));

    surface.resize(120, 80).expect("resize");

    assert_eq!((surface.width(), surface.height()), (120, 80));
    assert!(surface.is_blank());
    // The active stroke does not survive a resize.
    surface.extend_stroke(Point::new(100.0, 70.0));
    assert!(surface.is_blank());
}

#[test]
fn test_background_fill_value() {
    let bg = background_pixel();
    assert!(close_to(bg, BACKGROUND, 1), "background {bg:?}");
}

// ============================================================================
// Export Tests
// ============================================================================

#[test]
fn test_export_png_round_trip_preserves_pixels() {
    let mut surface = DrawingSurface::new(64, 48).expect("surface");
    surface.select_color(Rgba::opaque(0xFF, 0xA5, 0x00));
    surface.begin_stroke(Point::new(4.0, 4.0));
    surface.extend_stroke(Point::new(60.0, 44.0));
    surface.set_eraser(true);
    surface.extend_stroke(Point::new(60.0, 4.0));
    surface.end_stroke();

    let payload = surface.export().expect("export");
    let decoded = DataUrl::parse(&payload.to_data_url()).expect("parse data url");
    assert_eq!(decoded.bytes, payload.png_bytes());

    let image = image::load_from_memory(&decoded.bytes)
        .expect("decode png")
        .to_rgba8();
    assert_eq!(image.dimensions(), (64, 48));

    for (x, y, px) in image.enumerate_pixels() {
        let expected = surface.pixel(x, y).expect("pixel");
        assert_eq!(
            [expected.r, expected.g, expected.b, expected.a],
            px.0,
            "pixel mismatch at ({x}, {y})"
        );
    }
}

// ============================================================================
// Properties
// ============================================================================

fn stroke_strategy() -> impl Strategy<Value = Vec<(f32, f32)>> {
    prop::collection::vec((0.0f32..48.0, 0.0f32..48.0), 1..12)
}

proptest! {
    #[test]
    fn prop_reset_always_blank(
        strokes in prop::collection::vec(stroke_strategy(), 0..5),
        width in 1.0f32..20.0,
        palette_index in 0usize..9,
    ) {
        let mut surface = DrawingSurface::new(48, 48).expect("surface");
        surface.set_width(width);
        surface.select_color(canvas_core::PALETTE[palette_index].1);

        for stroke in &strokes {
            let (x0, y0) = stroke[0];
            surface.begin_stroke(Point::new(x0, y0));
            for &(x, y) in &stroke[1..] {
                surface.extend_stroke(Point::new(x, y));
            }
            surface.end_stroke();
        }

        surface.reset();
        prop_assert!(surface.is_blank());
    }

    #[test]
    fn prop_resize_always_blank(
        stroke in stroke_strategy(),
        new_width in 1u32..80,
        new_height in 1u32..80,
    ) {
        let mut surface = DrawingSurface::new(48, 48).expect("surface");
        let (x0, y0) = stroke[0];
        surface.begin_stroke(Point::new(x0, y0));
        for &(x, y) in &stroke {
            surface.extend_stroke(Point::new(x, y));
        }

        surface.resize(new_width, new_height).expect("resize");
        prop_assert!(surface.is_blank());
        prop_assert_eq!((surface.width(), surface.height()), (new_width, new_height));
    }
}

//! Consumer of streamline segments.

use crate::vector::Vector2;

/// Something that draws one straight segment between two field-space points.
///
/// The animation scheduler only knows this trait; rasterizing, styling and
/// coordinate mapping all live behind it.
pub trait SegmentSink {
    fn draw_segment(&mut self, a: Vector2, b: Vector2);
}

impl<F> SegmentSink for F
where
    F: FnMut(Vector2, Vector2),
{
    fn draw_segment(&mut self, a: Vector2, b: Vector2) {
        self(a, b)
    }
}

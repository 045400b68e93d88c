//! Bounding box types and field/screen coordinate mapping.

use serde::{Deserialize, Serialize};

use crate::vector::Vector2;

/// A rectangle in field space (texture texels).
///
/// Maps field coordinates to the unit square and then onto whatever
/// screen surface is active. No rotation or clipping is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its top-left corner and extent.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounding box covering a whole `width` x `height` texture.
    pub fn from_texture(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains(&self, p: &Vector2) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Field space to the unit square.
    pub fn to_normalized(&self, p: Vector2) -> Vector2 {
        Vector2::new((p.x - self.left) / self.width, (p.y - self.top) / self.height)
    }

    /// Field space to screen pixels for a `screen_width` x `screen_height` surface.
    pub fn to_screen(&self, p: Vector2, screen_width: f64, screen_height: f64) -> Vector2 {
        let n = self.to_normalized(p);
        Vector2::new(n.x * screen_width, n.y * screen_height)
    }

    /// Inverse of [`BoundingBox::to_screen`].
    pub fn from_screen(&self, p: Vector2, screen_width: f64, screen_height: f64) -> Vector2 {
        Vector2::new(
            p.x / screen_width * self.width + self.left,
            p.y / screen_height * self.height + self.top,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_screen_scales_each_axis() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        let p = bbox.to_screen(Vector2::new(60.0, 45.0), 1000.0, 500.0);
        assert_eq!(p, Vector2::new(500.0, 250.0));
    }
}

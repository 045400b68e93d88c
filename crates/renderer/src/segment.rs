//! Streamline segment styling and the render targets it draws into.
//!
//! Each segment is colored by the wind speed at its midpoint: speed is
//! normalized by the calibration's maximum velocity, looked up in the color
//! ramp, and drawn with an alpha that grows with speed.

use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use windmap_common::{BoundingBox, Rgb, SegmentSink, Vector2, WindmapError};

use crate::field::VectorFieldSampler;
use crate::gradient::ColorGradient;

/// Alpha at zero intensity.
pub const BASE_ALPHA: f64 = 0.2;

/// Alpha gained per unit of intensity.
pub const ALPHA_PER_INTENSITY: f64 = 1.5;

/// Stroke used when the midpoint falls outside the field.
pub const FALLBACK_STROKE: StrokeStyle = StrokeStyle {
    color: Rgb::BLACK,
    alpha: 1.0,
};

/// Stroke color plus alpha.
///
/// `alpha` may exceed 1.0; targets saturate it when compositing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgb,
    pub alpha: f64,
}

/// `0.2 + 1.5 * intensity`, unclamped.
pub fn stroke_alpha(intensity: f64) -> f64 {
    BASE_ALPHA + ALPHA_PER_INTENSITY * intensity
}

/// A surface that accepts straight line strokes in screen space.
pub trait RenderTarget {
    /// Surface size in pixels (width, height).
    fn size(&self) -> (f64, f64);

    fn stroke_line(&mut self, from: Vector2, to: Vector2, style: &StrokeStyle);

    fn stroke_polyline(&mut self, points: &[Vector2], style: &StrokeStyle);

    fn fill(&mut self, color: Rgb);
}

/// Raster target backed by a tiny-skia pixmap.
pub struct PixmapTarget {
    pixmap: Pixmap,
    line_width: f32,
}

impl PixmapTarget {
    pub fn new(width: u32, height: u32, line_width: f32) -> Result<Self, WindmapError> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            WindmapError::Render(format!("Failed to create {}x{} pixmap", width, height))
        })?;
        Ok(Self { pixmap, line_width })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight (non-premultiplied) RGBA bytes, ready for PNG encoding.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    fn paint(style: &StrokeStyle) -> Paint<'static> {
        let alpha = (style.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut paint = Paint::default();
        paint.set_color_rgba8(style.color.r, style.color.g, style.color.b, alpha);
        paint.anti_alias = true;
        paint
    }

    fn stroke(&self) -> Stroke {
        Stroke {
            width: self.line_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        }
    }
}

impl RenderTarget for PixmapTarget {
    fn size(&self) -> (f64, f64) {
        (self.pixmap.width() as f64, self.pixmap.height() as f64)
    }

    fn stroke_line(&mut self, from: Vector2, to: Vector2, style: &StrokeStyle) {
        self.stroke_polyline(&[from, to], style);
    }

    fn stroke_polyline(&mut self, points: &[Vector2], style: &StrokeStyle) {
        if points.len() < 2 {
            return;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(points[0].x as f32, points[0].y as f32);
        for p in &points[1..] {
            pb.line_to(p.x as f32, p.y as f32);
        }

        let paint = Self::paint(style);
        let stroke = self.stroke();
        if let Some(path) = pb.finish() {
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn fill(&mut self, color: Rgb) {
        self.pixmap
            .fill(Color::from_rgba8(color.r, color.g, color.b, 255));
    }
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Line {
        from: Vector2,
        to: Vector2,
        style: StrokeStyle,
    },
    Polyline {
        points: Vec<Vector2>,
        style: StrokeStyle,
    },
    Fill(Rgb),
}

/// Target that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingTarget {
    width: f64,
    height: f64,
    pub calls: Vec<DrawCall>,
}

impl RecordingTarget {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    /// Number of line strokes recorded so far.
    pub fn line_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { .. }))
            .count()
    }
}

impl RenderTarget for RecordingTarget {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn stroke_line(&mut self, from: Vector2, to: Vector2, style: &StrokeStyle) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            style: *style,
        });
    }

    fn stroke_polyline(&mut self, points: &[Vector2], style: &StrokeStyle) {
        self.calls.push(DrawCall::Polyline {
            points: points.to_vec(),
            style: *style,
        });
    }

    fn fill(&mut self, color: Rgb) {
        self.calls.push(DrawCall::Fill(color));
    }
}

/// Draws field-space segments onto a render target.
pub struct SegmentRenderer<'a, T: RenderTarget> {
    sampler: &'a VectorFieldSampler,
    gradient: &'a ColorGradient,
    bbox: BoundingBox,
    target: &'a mut T,
    max_velocity: f64,
}

impl<'a, T: RenderTarget> SegmentRenderer<'a, T> {
    pub fn new(
        sampler: &'a VectorFieldSampler,
        gradient: &'a ColorGradient,
        bbox: BoundingBox,
        target: &'a mut T,
    ) -> Self {
        let max_velocity = sampler.calibration().max_velocity();
        Self {
            sampler,
            gradient,
            bbox,
            target,
            max_velocity,
        }
    }

    /// Speed at `midpoint` divided by the calibration maximum.
    pub fn intensity_at(&self, midpoint: Vector2) -> Option<f64> {
        self.sampler
            .sample(midpoint)
            .map(|v| v.length() / self.max_velocity)
    }

    /// Stroke style for a segment whose midpoint is `midpoint`.
    pub fn style_at(&self, midpoint: Vector2) -> StrokeStyle {
        match self.intensity_at(midpoint) {
            Some(intensity) => StrokeStyle {
                color: self.gradient.color_at(intensity),
                alpha: stroke_alpha(intensity),
            },
            None => FALLBACK_STROKE,
        }
    }

    /// Field space to the target's pixel space.
    pub fn to_screen(&self, p: Vector2) -> Vector2 {
        let (w, h) = self.target.size();
        self.bbox.to_screen(p, w, h)
    }

    pub fn draw_segment(&mut self, a: Vector2, b: Vector2) {
        let style = self.style_at(a.midpoint(&b));
        let from = self.to_screen(a);
        let to = self.to_screen(b);
        self.target.stroke_line(from, to, &style);
    }
}

impl<T: RenderTarget> SegmentSink for SegmentRenderer<'_, T> {
    fn draw_segment(&mut self, a: Vector2, b: Vector2) {
        SegmentRenderer::draw_segment(self, a, b);
    }
}

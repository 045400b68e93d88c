//! Continuous wind field sampled from an RGBA wind texture.
//!
//! The texture stores normalized U in the red channel and V in the green
//! channel. Sampling interpolates the four surrounding texels and maps the
//! result back to physical velocity with the snapshot's calibration bounds.

use windmap_common::{BoundingBox, CalibrationConstants, LoadError, Vector2, VectorField};

/// Raw decoded texture: row-major RGBA bytes.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap decoded RGBA bytes, checking the length matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, LoadError> {
        if width == 0 || height == 0 {
            return Err(LoadError::InvalidBuffer(format!(
                "texture has no pixels ({}x{})",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(LoadError::InvalidBuffer(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

/// Bilinear sampler over a wind texture.
#[derive(Debug, Clone)]
pub struct VectorFieldSampler {
    buffer: PixelBuffer,
    calibration: CalibrationConstants,
}

impl VectorFieldSampler {
    pub fn new(buffer: PixelBuffer, calibration: CalibrationConstants) -> Self {
        Self { buffer, calibration }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    pub fn calibration(&self) -> &CalibrationConstants {
        &self.calibration
    }

    /// The full texture extent in field space.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_texture(self.buffer.width, self.buffer.height)
    }

    /// Normalized (R/255, G/255) at a texel, `None` outside the texture.
    pub fn texel(&self, x: i64, y: i64) -> Option<Vector2> {
        if self.outside(x, y) {
            return None;
        }
        let idx = (x as usize + y as usize * self.buffer.width as usize) * 4;
        Some(Vector2::new(
            self.buffer.pixels[idx] as f64 / 255.0,
            self.buffer.pixels[idx + 1] as f64 / 255.0,
        ))
    }

    /// Velocity at `position` (texture pixel coordinates), in m/s.
    ///
    /// Returns `None` when the position or any of the four texels it needs
    /// falls outside the texture.
    pub fn sample(&self, position: Vector2) -> Option<Vector2> {
        let width = self.buffer.width as i64;
        let height = self.buffer.height as i64;

        let mut lx = position.x.floor() as i64;
        let mut ly = position.y.floor() as i64;
        let mut ux = position.x.ceil() as i64;
        let mut uy = position.y.ceil() as i64;

        // One-sided repair; x uses >= but y uses > (uy may equal height).
        if lx < 0 {
            lx = ux;
        }
        if ux >= width {
            ux = lx;
        }
        if ly < 0 {
            ly = uy;
        }
        if uy > height {
            uy = ly;
        }

        let corner_outside = |x: i64, y: i64| x < 0 || x >= width || y < 0 || y > height;
        if corner_outside(lx, ly) || corner_outside(ux, uy) {
            return None;
        }

        let tl = self.texel(lx, ly)?;
        let tr = self.texel(lx + 1, ly)?;
        let bl = self.texel(lx, ly + 1)?;
        let br = self.texel(lx + 1, ly + 1)?;

        let frac_x = position.x - lx as f64;
        let frac_y = position.y - ly as f64;

        let top = mix(tl, tr, frac_x);
        let bottom = mix(bl, br, frac_x);
        let raw = mix(top, bottom, 1.0 - frac_y);

        Some(self.denormalize(raw))
    }

    /// Map a normalized texel value to physical velocity.
    ///
    /// U is negated to match the texture's encoding convention.
    pub fn denormalize(&self, raw: Vector2) -> Vector2 {
        let c = &self.calibration;
        Vector2::new(
            -(raw.x * c.u_range() + c.u_min),
            raw.y * c.v_range() + c.v_min,
        )
    }

    fn outside(&self, x: i64, y: i64) -> bool {
        x < 0 || x >= self.buffer.width as i64 || y < 0 || y >= self.buffer.height as i64
    }
}

impl VectorField for VectorFieldSampler {
    fn sample(&self, position: Vector2) -> Option<Vector2> {
        VectorFieldSampler::sample(self, position)
    }
}

/// `a * ratio + b * (1 - ratio)`, component-wise.
#[inline]
fn mix(a: Vector2, b: Vector2, ratio: f64) -> Vector2 {
    Vector2::new(
        a.x * ratio + b.x * (1.0 - ratio),
        a.y * ratio + b.y * (1.0 - ratio),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_weights_first_argument_by_ratio() {
        let a = Vector2::new(1.0, 0.0);
        let b = Vector2::new(0.0, 1.0);
        assert_eq!(mix(a, b, 1.0), a);
        assert_eq!(mix(a, b, 0.0), b);
        assert_eq!(mix(a, b, 0.25), Vector2::new(0.25, 0.75));
    }

    #[test]
    fn test_pixel_buffer_rejects_wrong_length() {
        assert!(PixelBuffer::new(2, 2, vec![0; 15]).is_err());
        assert!(PixelBuffer::new(0, 2, vec![]).is_err());
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
    }
}

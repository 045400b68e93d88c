//! Synthetic wind textures for tests.
//!
//! Textures are plain `(width, height, rgba)` data so they can be fed to
//! any crate without this crate depending on the renderer.

use std::io::Cursor;

/// A generated RGBA wind texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureFixture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureFixture {
    /// Byte offset of texel (x, y).
    pub fn offset(&self, x: u32, y: u32) -> usize {
        ((x + y * self.width) * 4) as usize
    }

    /// The (R, G) bytes at texel (x, y).
    pub fn rg(&self, x: u32, y: u32) -> (u8, u8) {
        let idx = self.offset(x, y);
        (self.pixels[idx], self.pixels[idx + 1])
    }

    /// Encode as a PNG image.
    pub fn to_png(&self) -> Vec<u8> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .expect("fixture dimensions match pixel buffer");
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageOutputFormat::Png)
            .expect("PNG encoding of fixture");
        out.into_inner()
    }
}

/// Builds a texture from per-texel (R, G) values in row-major order.
///
/// B is set to 0 and A to 255.
pub fn texture_from_rg(width: u32, height: u32, texels: &[(u8, u8)]) -> TextureFixture {
    assert_eq!(texels.len(), (width * height) as usize, "one (R, G) pair per texel");
    let mut pixels = Vec::with_capacity(texels.len() * 4);
    for &(r, g) in texels {
        pixels.extend_from_slice(&[r, g, 0, 255]);
    }
    TextureFixture {
        width,
        height,
        pixels,
    }
}

/// Every texel holds the same (R, G).
pub fn uniform_texture(width: u32, height: u32, r: u8, g: u8) -> TextureFixture {
    texture_from_rg(width, height, &vec![(r, g); (width * height) as usize])
}

/// R ramps with x and G ramps with y, both over the full byte range.
///
/// Gives every texel a distinct, predictable value:
/// `R = x * 255 / (width - 1)`, `G = y * 255 / (height - 1)`.
pub fn ramp_texture(width: u32, height: u32) -> TextureFixture {
    let mut texels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.saturating_sub(1).max(1)) as u8;
            let g = (y * 255 / height.saturating_sub(1).max(1)) as u8;
            texels.push((r, g));
        }
    }
    texture_from_rg(width, height, &texels)
}

/// A rotating flow around the texture center.
///
/// Encoded against calibration `[-1, 1]` on both axes, so a texel value of
/// 127.5 means zero velocity.
pub fn vortex_texture(width: u32, height: u32) -> TextureFixture {
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let radius = cx.min(cy).max(1.0);

    let mut texels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let dx = (x as f64 - cx) / radius;
            let dy = (y as f64 - cy) / radius;
            // Sampling negates U, so the decoded flow is (-dy, dx).
            let u = dy.clamp(-1.0, 1.0);
            let v = dx.clamp(-1.0, 1.0);
            let r = ((u + 1.0) / 2.0 * 255.0).round() as u8;
            let g = ((v + 1.0) / 2.0 * 255.0).round() as u8;
            texels.push((r, g));
        }
    }
    texture_from_rg(width, height, &texels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_from_rg_layout() {
        let tex = texture_from_rg(2, 1, &[(1, 2), (3, 4)]);
        assert_eq!(tex.pixels, vec![1, 2, 0, 255, 3, 4, 0, 255]);
        assert_eq!(tex.rg(1, 0), (3, 4));
    }

    #[test]
    fn test_ramp_texture_corners() {
        let tex = ramp_texture(4, 3);
        assert_eq!(tex.rg(0, 0), (0, 0));
        assert_eq!(tex.rg(3, 2), (255, 255));
    }

    #[test]
    fn test_png_decodes_back() {
        let tex = ramp_texture(5, 4);
        let decoded = image::load_from_memory(&tex.to_png()).unwrap().to_rgba8();
        assert_eq!(decoded.into_raw(), tex.pixels);
    }
}

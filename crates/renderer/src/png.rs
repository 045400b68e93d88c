//! PNG encoding for rendered frames.
//!
//! Frames are written as 8-bit RGBA (color type 6). Scanlines use the Sub
//! filter by default, which suits the mostly flat background with thin
//! strokes that streamline frames consist of.

use std::io::Write;

use crate::segment::PixmapTarget;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Per-scanline filter applied before compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowFilter {
    None,
    #[default]
    Sub,
}

impl RowFilter {
    fn type_byte(self) -> u8 {
        match self {
            RowFilter::None => 0,
            RowFilter::Sub => 1,
        }
    }
}

/// Encode straight RGBA pixel data as PNG.
///
/// # Arguments
/// - `pixels`: RGBA pixel data (4 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    create_png_with_filter(pixels, width, height, RowFilter::default())
}

pub fn create_png_with_filter(
    pixels: &[u8],
    width: usize,
    height: usize,
    filter: RowFilter,
) -> Result<Vec<u8>, String> {
    if width == 0 || height == 0 {
        return Err(format!("Cannot encode empty image ({}x{})", width, height));
    }
    if pixels.len() != width * height * 4 {
        return Err(format!(
            "Pixel buffer has {} bytes, expected {} for {}x{} RGBA",
            pixels.len(),
            width * height * 4,
            width,
            height
        ));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(6); // color type (RGBA)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    let idat_data = deflate_scanlines(pixels, width, height, filter)
        .map_err(|e| format!("IDAT compression failed: {}", e))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode the current contents of a pixmap target.
pub fn encode_frame(target: &PixmapTarget) -> Result<Vec<u8>, String> {
    create_png(
        &target.to_rgba(),
        target.width() as usize,
        target.height() as usize,
    )
}

/// Write a PNG chunk: length, type, data, CRC over type + data.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

fn deflate_scanlines(
    pixels: &[u8],
    width: usize,
    height: usize,
    filter: RowFilter,
) -> std::io::Result<Vec<u8>> {
    let stride = width * 4;
    let mut filtered = Vec::with_capacity(height * (1 + stride));

    for row in pixels.chunks_exact(stride) {
        filtered.push(filter.type_byte());
        match filter {
            RowFilter::None => filtered.extend_from_slice(row),
            RowFilter::Sub => {
                for (i, &byte) in row.iter().enumerate() {
                    let left = if i >= 4 { row[i - 4] } else { 0 };
                    filtered.push(byte.wrapping_sub(left));
                }
            }
        }
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&filtered)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_filter_stores_left_differences() {
        let pixels = [10, 20, 30, 255, 15, 20, 25, 255];
        let compressed = deflate_scanlines(&pixels, 2, 1, RowFilter::Sub).unwrap();

        let mut decoder = flate2::read::ZlibDecoder::new(compressed.as_slice());
        let mut raw = Vec::new();
        std::io::Read::read_to_end(&mut decoder, &mut raw).unwrap();

        assert_eq!(raw, vec![1, 10, 20, 30, 255, 5, 0, 251, 0]);
    }

    #[test]
    fn test_chunk_layout() {
        let mut out = Vec::new();
        write_chunk(&mut out, b"IEND", &[]);
        assert_eq!(&out[0..4], &[0, 0, 0, 0]);
        assert_eq!(&out[4..8], b"IEND");
        assert_eq!(&out[8..12], &crc32fast::hash(b"IEND").to_be_bytes());
    }
}

//! Common test fixtures for windmap tests.

use std::io::Write;
use std::path::PathBuf;

use windmap_common::{CalibrationConstants, ColorStop, Vector2};

use crate::generators::{texture_from_rg, TextureFixture};

/// Symmetric calibration: both components span [-1, 1] m/s.
pub fn unit_calibration() -> CalibrationConstants {
    CalibrationConstants::new(-1.0, 1.0, -1.0, 1.0)
}

/// Black to white in two stops.
pub fn grayscale_stops() -> Vec<ColorStop> {
    vec![ColorStop::new(0.0, 0, 0, 0), ColorStop::new(1.0, 255, 255, 255)]
}

/// Three stops with an interior stop at 0.25.
pub fn three_stops() -> Vec<ColorStop> {
    vec![
        ColorStop::new(0.0, 0, 0, 200),
        ColorStop::new(0.25, 0, 200, 0),
        ColorStop::new(1.0, 200, 0, 0),
    ]
}

/// The 2x2 texture with texels
/// `(0,0)=(255,0)`, `(1,0)=(0,255)`, `(0,1)=(0,0)`, `(1,1)=(255,255)`.
pub fn two_by_two_texture() -> TextureFixture {
    texture_from_rg(2, 2, &[(255, 0), (0, 255), (0, 0), (255, 255)])
}

/// A straight horizontal streamline with `n` points spaced one texel apart.
pub fn straight_streamline(start: Vector2, n: usize) -> Vec<Vector2> {
    (0..n)
        .map(|i| Vector2::new(start.x + i as f64, start.y))
        .collect()
}

/// A small FeatureCollection with one LineString and one MultiLineString.
pub const SAMPLE_COASTLINE_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {"scalerank": 1},
      "geometry": {
        "type": "LineString",
        "coordinates": [[-180.0, 90.0], [0.0, 0.0], [180.0, -90.0]]
      }
    },
    {
      "type": "Feature",
      "properties": {},
      "geometry": {
        "type": "MultiLineString",
        "coordinates": [
          [[-90.0, 45.0], [-45.0, 45.0]],
          [[90.0, -45.0], [45.0, -45.0, 12.0]]
        ]
      }
    },
    {
      "type": "Feature",
      "properties": {},
      "geometry": {"type": "Point", "coordinates": [10.0, 10.0]}
    }
  ]
}"#;

/// Write `contents` to a named temporary file that lives as long as the handle.
pub fn temp_file_with(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// A fresh temporary directory for output files.
pub fn temp_output_dir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().to_path_buf();
    (dir, path)
}

//! Coastline outlines from GeoJSON, drawn under the streamlines.
//!
//! Only line geometries are used. Coordinates are `[lon, lat]` degrees and
//! are projected equirectangularly onto the whole target surface.

use serde::Deserialize;
use tracing::debug;
use windmap_common::{LoadError, Rgb, Vector2};

use crate::segment::{RenderTarget, StrokeStyle};

/// Default outline color.
pub const COASTLINE_COLOR: Rgb = Rgb::new(0x55, 0x77, 0x88);

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    #[serde(other)]
    Unsupported,
}

/// Decoded coastline polylines in lon/lat degrees.
#[derive(Debug, Clone, Default)]
pub struct Coastline {
    lines: Vec<Vec<(f64, f64)>>,
}

impl Coastline {
    /// Parse a GeoJSON FeatureCollection.
    pub fn from_geojson(json: &str) -> Result<Self, LoadError> {
        let collection: FeatureCollection = serde_json::from_str(json)?;

        let mut lines = Vec::new();
        let mut skipped = 0usize;
        for feature in collection.features {
            match feature.geometry {
                Some(Geometry::LineString { coordinates }) => lines.push(to_line(&coordinates)?),
                Some(Geometry::MultiLineString { coordinates }) => {
                    for part in &coordinates {
                        lines.push(to_line(part)?);
                    }
                }
                Some(Geometry::Unsupported) | None => skipped += 1,
            }
        }

        debug!(lines = lines.len(), skipped = skipped, "Decoded coastline");
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[Vec<(f64, f64)>] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Stroke every polyline onto `target`.
    pub fn draw<T: RenderTarget>(&self, target: &mut T, color: Rgb) {
        let (width, height) = target.size();
        let style = StrokeStyle { color, alpha: 1.0 };

        for line in &self.lines {
            let points: Vec<Vector2> = line
                .iter()
                .map(|&(lon, lat)| project(lon, lat, width, height))
                .collect();
            target.stroke_polyline(&points, &style);
        }
    }
}

/// Equirectangular projection of lon/lat onto a `width` x `height` surface.
pub fn project(lon: f64, lat: f64, width: f64, height: f64) -> Vector2 {
    Vector2::new((lon + 180.0) * width / 360.0, (90.0 - lat) * height / 180.0)
}

fn to_line(coordinates: &[Vec<f64>]) -> Result<Vec<(f64, f64)>, LoadError> {
    coordinates
        .iter()
        .map(|c| match c.as_slice() {
            [lon, lat, ..] => Ok((*lon, *lat)),
            _ => Err(LoadError::Geojson(format!(
                "position needs at least 2 values, got {}",
                c.len()
            ))),
        })
        .collect()
}

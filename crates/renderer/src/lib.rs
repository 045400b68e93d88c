//! Wind field sampling and streamline rendering.
//!
//! - Bilinear vector field sampling from wind textures
//! - Color ramps for wind speed
//! - Segment styling and raster targets
//! - Coastline outlines
//! - PNG frame encoding

pub mod coastline;
pub mod field;
pub mod gradient;
pub mod png;
pub mod segment;

pub use coastline::Coastline;
pub use field::{PixelBuffer, VectorFieldSampler};
pub use gradient::ColorGradient;
pub use segment::{PixmapTarget, RecordingTarget, RenderTarget, SegmentRenderer, StrokeStyle};

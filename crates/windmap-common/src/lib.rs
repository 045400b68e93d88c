//! Common types shared by the windmap crates.

pub mod bbox;
pub mod calibration;
pub mod error;
pub mod field;
pub mod sink;
pub mod style;
pub mod vector;

pub use bbox::BoundingBox;
pub use calibration::CalibrationConstants;
pub use error::{GradientError, LoadError, WindmapError, WindmapResult};
pub use field::VectorField;
pub use sink::SegmentSink;
pub use style::{ColorStop, GradientConfig, Rgb, StopColor};
pub use vector::Vector2;

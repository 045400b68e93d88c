//! Error types for the windmap pipeline.

use thiserror::Error;

/// Result type alias using WindmapError.
pub type WindmapResult<T> = Result<T, WindmapError>;

/// Primary error type for the windmap pipeline.
#[derive(Debug, Error)]
pub enum WindmapError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Gradient(#[from] GradientError),

    #[error("Invalid calibration: {0}")]
    Calibration(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}

impl WindmapError {
    /// An input could not be fetched or decoded.
    ///
    /// The driver has already written the background frame when a wind
    /// load fails.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, WindmapError::Load(_))
    }
}

/// Failure to fetch or decode an input (wind texture, coastline).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Unexpected status code {status} when calling {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to download {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to decode {source_name}: {message}")]
    Decode { source_name: String, message: String },

    #[error("Invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("Invalid GeoJSON: {0}")]
    Geojson(String),
}

/// A gradient stop list that does not cover [0, 1] contiguously.
///
/// This is a configuration invariant violation, raised when the gradient
/// is built rather than on lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradientError {
    #[error("Gradient must have at least 2 color stops, got {0}")]
    TooFewStops(usize),

    #[error("Stop {index} has a non-finite position")]
    NonFinitePosition { index: usize },

    #[error("First stop must sit at 0.0, found {0}")]
    DoesNotStartAtZero(f64),

    #[error("Last stop must sit at 1.0, found {0}")]
    DoesNotEndAtOne(f64),

    #[error("Stop {index} is not strictly after the previous stop")]
    NotIncreasing { index: usize },

    #[error("Stop {index} has an invalid color: {message}")]
    InvalidColor { index: usize, message: String },
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Geojson(err.to_string())
    }
}

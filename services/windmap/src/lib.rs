//! Windmap renderer service.
//!
//! Loads a wind texture and coastline, then animates evenly spaced
//! streamlines into PNG frames.

pub mod config;
pub mod loader;
pub mod orchestrator;

pub use config::{ConfigOverrides, WindmapConfig};
pub use loader::{Source, WindTextureLoader};
pub use orchestrator::{Orchestrator, RunSummary};

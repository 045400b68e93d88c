//! Windmap configuration loading and types.
//!
//! Every section has defaults, so an empty file (or no file at all) yields
//! the stock rendering of the bundled GFS snapshot. Command-line flags are
//! layered on top through [`ConfigOverrides`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use renderer::gradient::validate_stops;
use serde::{Deserialize, Serialize};
use streamlines::{GeneratorConfig, SchedulerConfig};
use windmap_common::{CalibrationConstants, GradientConfig, Rgb, WindmapError, WindmapResult};

/// Complete windmap configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindmapConfig {
    pub render: RenderConfig,
    pub animation: AnimationConfig,
    pub generator: GeneratorConfig,
    pub calibration: CalibrationConstants,
    pub gradient: GradientConfig,
    pub sources: SourcesConfig,
    pub output: OutputConfig,
}

/// Canvas size and fixed colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub line_width: f32,
    pub background: String,
    pub coastline_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 720,
            line_width: 1.0,
            background: "#0A1936".to_string(),
            coastline_color: "#578".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn background_rgb(&self) -> WindmapResult<Rgb> {
        parse_color("render.background", &self.background)
    }

    pub fn coastline_rgb(&self) -> WindmapResult<Rgb> {
        parse_color("render.coastline_color", &self.coastline_color)
    }
}

/// Frame loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub max_animations: usize,
    pub points_per_animation: usize,
    /// Frames per second; 0 renders as fast as possible.
    pub fps: u32,
    /// Stop after this many frames even if streamlines remain.
    pub frames: Option<u64>,
    /// RNG seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        let scheduler = SchedulerConfig::default();
        Self {
            max_animations: scheduler.max_animations,
            points_per_animation: scheduler.points_per_animation,
            fps: 60,
            frames: None,
            seed: None,
        }
    }
}

impl AnimationConfig {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            max_animations: self.max_animations,
            points_per_animation: self.points_per_animation,
        }
    }
}

/// Where inputs come from. Each entry is a file path or an http(s) URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub wind: String,
    /// `None` skips the coastline layer.
    pub coastline: Option<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            wind: "2019010300.png".to_string(),
            coastline: Some("ne_110m_coastline.geojson".to_string()),
        }
    }
}

/// Where frames are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    /// Write `<stem>_<frame:05>.png` every n frames.
    pub snapshot_every: Option<u64>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("windmap.png"),
            snapshot_every: None,
        }
    }
}

impl OutputConfig {
    /// Path of the snapshot taken after `frame`.
    pub fn snapshot_path(&self, frame: u64) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "windmap".to_string());
        self.path.with_file_name(format!("{}_{:05}.png", stem, frame))
    }
}

impl WindmapConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse windmap config")
    }

    /// Load a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse windmap config: {:?}", path))
    }

    /// Check every section. Called before any input is loaded.
    pub fn validate(&self) -> WindmapResult<()> {
        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(WindmapError::Config(format!(
                "Canvas must be non-empty, got {}x{}",
                render.width, render.height
            )));
        }
        if !(render.line_width.is_finite() && render.line_width > 0.0) {
            return Err(WindmapError::Config(format!(
                "render.line_width must be positive, got {}",
                render.line_width
            )));
        }
        render.background_rgb()?;
        render.coastline_rgb()?;

        if self.animation.points_per_animation == 0 {
            return Err(WindmapError::Config(
                "animation.points_per_animation must be at least 1".to_string(),
            ));
        }
        if self.output.snapshot_every == Some(0) {
            return Err(WindmapError::Config(
                "output.snapshot_every must be at least 1".to_string(),
            ));
        }
        if self.sources.wind.trim().is_empty() {
            return Err(WindmapError::Config("sources.wind is empty".to_string()));
        }

        self.generator
            .validate()
            .map_err(|e| WindmapError::Config(e.to_string()))?;
        self.calibration
            .validate()
            .map_err(WindmapError::Calibration)?;
        let stops = self.gradient.resolve()?;
        validate_stops(&stops)?;

        Ok(())
    }
}

fn parse_color(field: &str, value: &str) -> WindmapResult<Rgb> {
    Rgb::from_hex(value)
        .ok_or_else(|| WindmapError::Config(format!("{} is not a hex color: '{}'", field, value)))
}

/// Values supplied on the command line, applied over the file config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub wind: Option<String>,
    pub coastline: Option<String>,
    pub no_coastline: bool,
    pub output: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frames: Option<u64>,
    pub snapshot_every: Option<u64>,
    pub seed: Option<u64>,
    pub fps: Option<u32>,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut WindmapConfig) {
        if let Some(wind) = self.wind {
            config.sources.wind = wind;
        }
        if self.no_coastline {
            config.sources.coastline = None;
        } else if let Some(coastline) = self.coastline {
            config.sources.coastline = Some(coastline);
        }
        if let Some(output) = self.output {
            config.output.path = output;
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if self.frames.is_some() {
            config.animation.frames = self.frames;
        }
        if self.snapshot_every.is_some() {
            config.output.snapshot_every = self.snapshot_every;
        }
        if self.seed.is_some() {
            config.animation.seed = self.seed;
        }
        if let Some(fps) = self.fps {
            config.animation.fps = fps;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_path_uses_stem() {
        let output = OutputConfig {
            path: PathBuf::from("/tmp/out/wind.png"),
            snapshot_every: Some(10),
        };
        assert_eq!(
            output.snapshot_path(42),
            PathBuf::from("/tmp/out/wind_00042.png")
        );
    }

    #[test]
    fn test_scheduler_config_copies_animation_settings() {
        let animation = AnimationConfig {
            max_animations: 3,
            points_per_animation: 7,
            ..AnimationConfig::default()
        };
        let scheduler = animation.scheduler_config();
        assert_eq!(scheduler.max_animations, 3);
        assert_eq!(scheduler.points_per_animation, 7);
    }
}

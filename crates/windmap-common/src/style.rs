//! Color ramp configuration for streamline rendering.
//!
//! Stops are written in config files as `{ position, color }` pairs where
//! the color may be a hex string, an `[r, g, b]` array or an explicit
//! `{ r, g, b }` object.

use serde::{Deserialize, Serialize};

use crate::error::GradientError;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse "#rrggbb" or the short "#rgb" form.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        // Byte slicing below relies on single-byte digits.
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match s.len() {
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16).ok()?;
                let g = u8::from_str_radix(&s[2..4], 16).ok()?;
                let b = u8::from_str_radix(&s[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            3 => {
                let digit = |i: usize| u8::from_str_radix(&s[i..i + 1], 16).ok().map(|d| d * 17);
                Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color as it appears in a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopColor {
    /// Hex string: "#RRGGBB" or "#RGB"
    Hex(String),

    /// RGB array: [r, g, b]
    Array(Vec<u8>),

    /// Explicit channels
    Rgb { r: u8, g: u8, b: u8 },
}

impl StopColor {
    pub fn to_rgb(&self) -> Result<Rgb, String> {
        match self {
            StopColor::Hex(s) => Rgb::from_hex(s).ok_or_else(|| format!("Invalid hex color '{}'", s)),
            StopColor::Array(arr) => match arr.as_slice() {
                [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
                _ => Err(format!("Color arrays need exactly 3 channels, got {}", arr.len())),
            },
            StopColor::Rgb { r, g, b } => Ok(Rgb::new(*r, *g, *b)),
        }
    }
}

impl From<Rgb> for StopColor {
    fn from(c: Rgb) -> Self {
        StopColor::Hex(c.to_hex())
    }
}

/// A resolved gradient stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(position: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            position,
            color: Rgb::new(r, g, b),
        }
    }
}

/// A stop as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopConfig {
    /// Position in [0, 1]
    pub position: f64,

    /// Color at this position
    pub color: StopColor,
}

/// Gradient section of the windmap config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientConfig {
    pub stops: Vec<StopConfig>,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            stops: default_stops()
                .into_iter()
                .map(|s| StopConfig {
                    position: s.position,
                    color: s.color.into(),
                })
                .collect(),
        }
    }
}

impl GradientConfig {
    /// Resolve config colors into [`ColorStop`]s.
    ///
    /// Only colors are checked here; ordering and coverage are validated
    /// when the gradient itself is built.
    pub fn resolve(&self) -> Result<Vec<ColorStop>, GradientError> {
        self.stops
            .iter()
            .enumerate()
            .map(|(index, stop)| {
                let color = stop
                    .color
                    .to_rgb()
                    .map_err(|message| GradientError::InvalidColor { index, message })?;
                Ok(ColorStop {
                    position: stop.position,
                    color,
                })
            })
            .collect()
    }
}

/// The spectral ramp used for wind speed.
pub fn default_stops() -> Vec<ColorStop> {
    vec![
        ColorStop::new(0.0, 0x32, 0x88, 0xbd),
        ColorStop::new(0.1, 0x66, 0xc2, 0xa5),
        ColorStop::new(0.2, 0xab, 0xdd, 0xa4),
        ColorStop::new(0.3, 0xe6, 0xf5, 0x98),
        ColorStop::new(0.4, 0xfe, 0xe0, 0x8b),
        ColorStop::new(0.5, 0xfd, 0xae, 0x61),
        ColorStop::new(1.0, 0xf4, 0x6d, 0x43),
    ]
}

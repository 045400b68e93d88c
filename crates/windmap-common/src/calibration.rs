//! Denormalization bounds for texture-encoded wind components.

use serde::{Deserialize, Serialize};

/// Physical velocity bounds of one wind snapshot.
///
/// The texture stores U and V as bytes in [0, 255]; these bounds map them
/// back to m/s. They are fixed for the lifetime of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConstants {
    pub u_min: f64,
    pub u_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

impl Default for CalibrationConstants {
    /// Bounds of the 2019-01-03 00Z GFS snapshot.
    fn default() -> Self {
        Self {
            u_min: -20.9104,
            u_max: 25.7396,
            v_min: -26.0981,
            v_max: 22.3119,
        }
    }
}

impl CalibrationConstants {
    pub fn new(u_min: f64, u_max: f64, v_min: f64, v_max: f64) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let all = [self.u_min, self.u_max, self.v_min, self.v_max];
        if all.iter().any(|v| !v.is_finite()) {
            return Err("Calibration bounds must be finite".to_string());
        }
        if self.u_min >= self.u_max {
            return Err(format!("u_min ({}) must be below u_max ({})", self.u_min, self.u_max));
        }
        if self.v_min >= self.v_max {
            return Err(format!("v_min ({}) must be below v_max ({})", self.v_min, self.v_max));
        }
        Ok(())
    }

    /// Normalizer for segment intensity: `sqrt(u_max² + v_max²)`.
    ///
    /// Derived from the bounds only, never from sampled data, so it is an
    /// approximation of the true field maximum.
    pub fn max_velocity(&self) -> f64 {
        (self.u_max * self.u_max + self.v_max * self.v_max).sqrt()
    }

    pub fn u_range(&self) -> f64 {
        self.u_max - self.u_min
    }

    pub fn v_range(&self) -> f64 {
        self.v_max - self.v_min
    }
}

//! Piecewise-linear color ramp over [0, 1].

use windmap_common::{ColorStop, GradientError, Rgb};

/// A validated color ramp.
///
/// Construction guarantees the stops are strictly increasing, start at 0.0
/// and end at 1.0, so every lookup finds a bracketing pair.
#[derive(Debug, Clone)]
pub struct ColorGradient {
    stops: Vec<ColorStop>,
}

impl ColorGradient {
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, GradientError> {
        validate_stops(&stops)?;
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at `t`, clamped to the end stops outside (0, 1).
    ///
    /// Inside a bracket `[from, to)` the weight of `from` grows with the
    /// distance travelled: `t == from.position` yields `to`'s color and the
    /// color approaches `from`'s as `t` nears `to.position`. The end stops
    /// are exact. NaN maps to the first stop.
    pub fn color_at(&self, t: f64) -> Rgb {
        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];

        if t.is_nan() || t <= 0.0 {
            return first.color;
        }
        if t >= 1.0 {
            return last.color;
        }

        // The list is small; a linear scan is enough.
        for pair in self.stops.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            if from.position <= t && t < to.position {
                let dist = (t - from.position) / (to.position - from.position);
                return interpolate_color(to.color, from.color, dist);
            }
        }

        unreachable!("validated stops cover [0, 1], no bracket for {}", t)
    }
}

/// Check a stop list covers [0, 1] with strictly increasing positions.
pub fn validate_stops(stops: &[ColorStop]) -> Result<(), GradientError> {
    if stops.len() < 2 {
        return Err(GradientError::TooFewStops(stops.len()));
    }

    for (index, stop) in stops.iter().enumerate() {
        if !stop.position.is_finite() {
            return Err(GradientError::NonFinitePosition { index });
        }
        if index > 0 && stop.position <= stops[index - 1].position {
            return Err(GradientError::NotIncreasing { index });
        }
    }

    let first = stops[0].position;
    if first != 0.0 {
        return Err(GradientError::DoesNotStartAtZero(first));
    }
    let last = stops[stops.len() - 1].position;
    if last != 1.0 {
        return Err(GradientError::DoesNotEndAtOne(last));
    }

    Ok(())
}

/// Linear color interpolation, each channel rounded to nearest.
pub fn interpolate_color(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| -> u8 { (a as f64 * (1.0 - t) + b as f64 * t).round() as u8 };

    Rgb::new(channel(from.r, to.r), channel(from.g, to.g), channel(from.b, to.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_color_endpoints() {
        let a = Rgb::new(0, 100, 200);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(interpolate_color(a, b, 0.0), a);
        assert_eq!(interpolate_color(a, b, 1.0), b);
        assert_eq!(interpolate_color(a, b, 0.5), Rgb::new(100, 100, 100));
    }

    #[test]
    fn test_interpolate_color_rounds_to_nearest() {
        let c = interpolate_color(Rgb::new(0, 0, 0), Rgb::new(1, 3, 255), 0.5);
        // 0.5 -> 1, 1.5 -> 2, 127.5 -> 128
        assert_eq!(c, Rgb::new(1, 2, 128));
    }
}

//! Shared test utilities for the windmap workspace.
//!
//! - Synthetic wind textures ([`generators`])
//! - Calibration, gradient, streamline and GeoJSON fixtures ([`fixtures`])
//! - Tolerance assertions for floats and [`Vector2`](windmap_common::Vector2)
//!
//! Pulled in as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Assert two numbers differ by at most `epsilon`.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(0.1 + 0.2, 0.3, 1e-12);
/// assert_approx_eq!(v.length(), 5.0, 1e-9, "length of {:?}", v);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {
        $crate::assert_approx_eq!($left, $right, $epsilon, "values differ")
    };
    ($left:expr, $right:expr, $epsilon:expr, $($context:tt)+) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        // NaN never compares within tolerance.
        if !((left - right).abs() <= epsilon) {
            panic!(
                "approx assertion failed: {}\n  left: {:?}\n right: {:?}\n  tolerance: {:?}",
                format_args!($($context)+),
                left,
                right,
                epsilon
            );
        }
    }};
}

/// Assert two vectors agree component-wise within `epsilon`.
#[macro_export]
macro_rules! assert_vec_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right) = ($left, $right);
        $crate::assert_approx_eq!(left.x, right.x, $epsilon, "x of {:?} vs {:?}", left, right);
        $crate::assert_approx_eq!(left.y, right.y, $epsilon, "y of {:?} vs {:?}", left, right);
    }};
}

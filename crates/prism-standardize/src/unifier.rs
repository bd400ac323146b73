//! Fixed-point precision conversion.

use prism_core::traits::IUnifier;

/// Default precision factor: four decimal places.
pub const DEFAULT_SCALE_FACTOR: i64 = 10_000;

/// Multiplier-based fixed-point converter. Scaling rounds half away
/// from zero, so `100.00019 * 10000` becomes `1000002`.
pub struct MetricUnifier {
    factor: i64,
}

impl MetricUnifier {
    /// A non-positive factor falls back to the default.
    pub fn new(factor: i64) -> Self {
        Self {
            factor: if factor > 0 {
                factor
            } else {
                DEFAULT_SCALE_FACTOR
            },
        }
    }
}

impl Default for MetricUnifier {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE_FACTOR)
    }
}

impl IUnifier for MetricUnifier {
    fn to_scaled(&self, value: f64) -> i64 {
        // f64::round is round-half-away-from-zero.
        (value * self.factor as f64).round() as i64
    }

    fn from_scaled(&self, value: i64) -> f64 {
        value as f64 / self.factor as f64
    }

    fn scale_factor(&self) -> i64 {
        self.factor
    }
}

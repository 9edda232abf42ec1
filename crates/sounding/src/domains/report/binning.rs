use serde::{Deserialize, Serialize};

/// Smallest axis span a clamped range may collapse to.
pub const MIN_AXIS_SPAN: f64 = 10.0;

/// Optional user limits for one chart axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Bounds { min, max }
    }

    /// Missing limits become infinite, so clamping still enforces `MIN_AXIS_SPAN`.
    pub fn or_unbounded(self) -> Self {
        Bounds {
            min: Some(self.min.unwrap_or(f64::NEG_INFINITY)),
            max: Some(self.max.unwrap_or(f64::INFINITY)),
        }
    }

    /// Clamp a natural `(low, high)` range against these limits.
    ///
    /// Both sides are computed from the natural range, and each side is only
    /// touched when its limit is set. `low` never rises above `high - MIN_AXIS_SPAN`
    /// and `high` never drops below `low + MIN_AXIS_SPAN`.
    pub fn clamp_range(&self, low: f64, high: f64) -> (f64, f64) {
        let clamped_low = self
            .min
            .map_or(low, |min| clamp(low, min, high - MIN_AXIS_SPAN));
        let clamped_high = self
            .max
            .map_or(high, |max| clamp(high, low + MIN_AXIS_SPAN, max));
        (clamped_low, clamped_high)
    }
}

/// `lower` wins when the limits cross.
pub fn clamp(value: f64, lower: f64, upper: f64) -> f64 {
    lower.max(upper.min(value))
}

/// Map `value` onto one of `bins` buckets spanning `[low, high]`.
///
/// Values outside the range land in the end buckets. A zero-width range,
/// a single bucket, or a non-finite value all map to bucket 0. Halfway
/// points round to the even bucket.
pub fn bin_index(value: f64, low: f64, high: f64, bins: usize) -> usize {
    let span = high - low;
    if bins <= 1 || span == 0.0 || !span.is_finite() || !value.is_finite() {
        return 0;
    }
    let last = (bins - 1) as f64;
    let scaled = (last * (value - low) / span).round_ties_even();
    scaled.clamp(0.0, last) as usize
}

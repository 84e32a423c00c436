//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Round a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Ratio of two non-negative integers as f32, returning 0.0 when the
/// denominator is zero or either side is negative.
#[must_use]
pub fn progress_ratio(numerator: i64, denominator: i64) -> f32 {
    if denominator <= 0 || numerator < 0 {
        return 0.0;
    }
    let ratio = i64_to_f64(numerator) / i64_to_f64(denominator);
    cast::<f64, f32>(ratio).unwrap_or(0.0)
}

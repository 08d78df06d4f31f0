//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Clamp a value into the shared [0, 100] stat range, mapping NaN to 0.
#[must_use]
pub fn clamp_pct(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Floor a f64 and saturate it to the i64 range, returning 0 for NaN values.
#[must_use]
pub fn floor_f64_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    let floored = value.floor();
    cast::<f64, i64>(floored).unwrap_or(if floored < 0.0 { i64::MIN } else { i64::MAX })
}

/// Floor a f64 into a non-negative count, returning 0 for NaN or negative values.
#[must_use]
pub fn floor_f64_to_u64(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    cast::<f64, u64>(value.floor()).unwrap_or(u64::MAX)
}

/// Floor a f64 into a chart position within `[min, max]`.
#[must_use]
pub fn floor_f64_to_rank(value: f64, min: u32, max: u32) -> u32 {
    let floored = floor_f64_to_i64(value);
    let clamped = floored.clamp(i64::from(min), i64::from(max));
    u32::try_from(clamped).unwrap_or(max)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Apply a signed delta to an unsigned counter without wrapping.
#[must_use]
pub const fn apply_signed(base: u64, delta: i64) -> u64 {
    if delta >= 0 {
        base.saturating_add(delta.unsigned_abs())
    } else {
        base.saturating_sub(delta.unsigned_abs())
    }
}

/// Scale an unsigned counter by a retention factor, flooring the result.
#[must_use]
pub fn retain_fraction(value: u64, factor: f64) -> u64 {
    floor_f64_to_u64(u64_to_f64(value) * factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_pct_handles_nan_and_bounds() {
        assert!((clamp_pct(f64::NAN) - 0.0).abs() < f64::EPSILON);
        assert!((clamp_pct(140.0) - 100.0).abs() < f64::EPSILON);
        assert!((clamp_pct(-3.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn floors_cover_ranges() {
        assert_eq!(floor_f64_to_i64(1.9), 1);
        assert_eq!(floor_f64_to_i64(-1.1), -2);
        assert_eq!(floor_f64_to_i64(f64::NAN), 0);
        assert_eq!(floor_f64_to_u64(-5.0), 0);
        assert_eq!(floor_f64_to_u64(12.7), 12);
    }

    #[test]
    fn huge_values_saturate_instead_of_zeroing() {
        assert_eq!(floor_f64_to_i64(9.3e18), i64::MAX);
        assert_eq!(floor_f64_to_i64(f64::INFINITY), i64::MAX);
        assert_eq!(floor_f64_to_i64(-9.3e18), i64::MIN);
        assert_eq!(floor_f64_to_u64(1.9e19), u64::MAX);
        assert_eq!(floor_f64_to_u64(f64::INFINITY), u64::MAX);
        assert_eq!(retain_fraction(u64::MAX, 1.0), u64::MAX);
        assert_eq!(floor_f64_to_rank(1e300, 1, 100), 100);
    }

    #[test]
    fn rank_floor_is_bounded() {
        assert_eq!(floor_f64_to_rank(-40.0, 1, 100), 1);
        assert_eq!(floor_f64_to_rank(250.0, 1, 100), 100);
        assert_eq!(floor_f64_to_rank(42.9, 1, 100), 42);
    }

    #[test]
    fn signed_application_saturates() {
        assert_eq!(apply_signed(10, -25), 0);
        assert_eq!(apply_signed(10, 5), 15);
        assert_eq!(apply_signed(u64::MAX, 1), u64::MAX);
        assert_eq!(retain_fraction(1_000, 0.8), 800);
    }
}

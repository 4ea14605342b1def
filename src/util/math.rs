//! Numeric helpers shared by geometry and suppression.

/// Returns `true` when `value` lies in the closed interval `[0, 1]`.
///
/// NaN is never inside the interval.
#[inline]
pub(crate) fn in_unit_interval(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Divides `num` by `den`, mapping any non-finite quotient to zero.
///
/// Covers the degenerate `0 / 0` IoU case between two zero-area boxes.
#[inline]
pub(crate) fn safe_ratio(num: f32, den: f32) -> f32 {
    let ratio = num / den;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{in_unit_interval, safe_ratio};

    #[test]
    fn unit_interval_is_closed() {
        assert!(in_unit_interval(0.0));
        assert!(in_unit_interval(1.0));
        assert!(!in_unit_interval(-f32::EPSILON));
        assert!(!in_unit_interval(1.0 + f32::EPSILON));
        assert!(!in_unit_interval(f32::NAN));
    }

    #[test]
    fn safe_ratio_maps_zero_over_zero_to_zero() {
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(1.0, 0.0), 0.0);
        assert!((safe_ratio(1.0, 4.0) - 0.25).abs() < 1e-6);
    }
}

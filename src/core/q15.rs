//! Q15 fixed-point sample helpers
//!
//! A Q15 sample is a plain `i16` read as a fraction in `[-1, 1)` scaled by
//! 2^15. Nothing in the type system carries the format; the arithmetic in the
//! kernels is what keeps values inside it.

/// A single Q15 sample.
pub type Sample = i16;

/// Largest representable Q15 value (`1 - 2^-15`).
pub const Q15_MAX: i16 = i16::MAX;

/// Smallest representable Q15 value (`-1.0`).
pub const Q15_MIN: i16 = i16::MIN;

/// Clamp a 32-bit accumulator into the Q15 range.
///
/// Values above 32767 saturate to 32767, values below -32768 saturate to
/// -32768, everything else is returned unchanged (the truncating cast cannot
/// lose information once the value is in range).
#[inline(always)]
pub fn saturate_q15(v: i32) -> i16 {
    if v > Q15_MAX as i32 {
        return Q15_MAX;
    }
    if v < Q15_MIN as i32 {
        return Q15_MIN;
    }
    v as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturate_in_range_is_identity() {
        for v in [-32768, -32767, -1, 0, 1, 130, 32766, 32767] {
            assert_eq!(saturate_q15(v) as i32, v);
        }
    }

    #[test]
    fn test_saturate_positive_overflow() {
        assert_eq!(saturate_q15(32768), Q15_MAX);
        assert_eq!(saturate_q15(1 << 30), Q15_MAX);
        assert_eq!(saturate_q15(i32::MAX), Q15_MAX);
    }

    #[test]
    fn test_saturate_negative_overflow() {
        assert_eq!(saturate_q15(-32769), Q15_MIN);
        assert_eq!(saturate_q15(-(1 << 30)), Q15_MIN);
        assert_eq!(saturate_q15(i32::MIN), Q15_MIN);
    }

    #[test]
    fn test_accumulator_bounds_fit_in_i32() {
        // Extreme AXPY accumulators must not overflow the 32-bit intermediate.
        let max = Q15_MAX as i64 + Q15_MIN as i64 * Q15_MIN as i64;
        let min = Q15_MIN as i64 + Q15_MIN as i64 * Q15_MAX as i64;
        assert!(max <= i32::MAX as i64);
        assert!(min >= i32::MIN as i64);
    }
}

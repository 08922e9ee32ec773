//! Scalar reference kernel
//!
//! One element at a time, straight from the definition. Every other kernel in
//! the crate is checked against this one.

use crate::core::q15::saturate_q15;

/// Assert the operand shapes shared by every kernel and return `n`.
#[inline]
pub(crate) fn check_operands(a: &[i16], b: &[i16], y: &[i16]) -> usize {
    let n = y.len();
    assert_eq!(a.len(), n, "operand a has {} samples, output has {}", a.len(), n);
    assert_eq!(b.len(), n, "operand b has {} samples, output has {}", b.len(), n);
    n
}

/// `y[i] = saturate_q15(a[i] + alpha * b[i])` for every `i`.
///
/// The sum is formed in `i32`; `|alpha * b[i]| <= 2^30` so it never overflows.
///
/// # Panics
/// If the three slices differ in length.
pub fn q15_axpy_ref(a: &[i16], b: &[i16], y: &mut [i16], alpha: i16) {
    check_operands(a, b, y);
    let alpha = alpha as i32;
    for ((out, &x), &z) in y.iter_mut().zip(a).zip(b) {
        let acc = x as i32 + alpha * z as i32;
        *out = saturate_q15(acc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_through() {
        let mut y = [0i16; 1];
        q15_axpy_ref(&[100], &[10], &mut y, 3);
        assert_eq!(y, [130]);
    }

    #[test]
    fn test_saturates_both_directions() {
        let a = [32767, -32768, 0, -1];
        let b = [32767, 32767, -32768, 1];
        let mut y = [0i16; 4];
        q15_axpy_ref(&a, &b, &mut y, 32767);
        assert_eq!(y, [32767, 32767, -32768, 32766]);

        q15_axpy_ref(&a, &b, &mut y, -32768);
        assert_eq!(y[0], -32768);
        assert_eq!(y[1], -32768);
        assert_eq!(y[2], 32767);
        assert_eq!(y[3], -32768);
    }

    #[test]
    fn test_negative_overflow() {
        let mut y = [0i16; 1];
        q15_axpy_ref(&[-32768], &[-32768], &mut y, 32767);
        // -32768 + (-32768 * 32767) is far below the range
        assert_eq!(y, [-32768]);
    }

    #[test]
    fn test_zero_length_is_noop() {
        let mut y: [i16; 0] = [];
        q15_axpy_ref(&[], &[], &mut y, 3);
    }

    #[test]
    #[should_panic(expected = "operand b")]
    fn test_length_mismatch_panics() {
        let mut y = [0i16; 3];
        q15_axpy_ref(&[1, 2, 3], &[1, 2], &mut y, 1);
    }
}

//! Element-wise comparison of a kernel's output against the reference.

use std::fmt;

/// Outcome of comparing two output arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    /// Every element matched.
    pub equal: bool,
    /// Largest `|reference[i] - test[i]|`, 0 when equal.
    pub max_abs_diff: i32,
    /// Number of indices that differ.
    pub mismatches: usize,
    /// First index that differs, if any.
    pub first_mismatch: Option<usize>,
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.equal { "OK" } else { "FAIL" };
        write!(f, "{} (max diff = {})", verdict, self.max_abs_diff)?;
        if let Some(i) = self.first_mismatch {
            write!(f, ", {} mismatches, first at index {}", self.mismatches, i)?;
        }
        Ok(())
    }
}

/// Compare `test` against `reference` element by element.
///
/// Differences are taken in `i32` so `32767 - (-32768)` does not overflow.
///
/// # Panics
/// If the slices differ in length.
pub fn verify_equal(reference: &[i16], test: &[i16]) -> Verification {
    assert_eq!(
        reference.len(),
        test.len(),
        "cannot compare {} reference samples against {} test samples",
        reference.len(),
        test.len()
    );

    let mut max_abs_diff = 0i32;
    let mut mismatches = 0usize;
    let mut first_mismatch = None;

    for (i, (&r, &t)) in reference.iter().zip(test).enumerate() {
        let d = (r as i32 - t as i32).abs();
        if d != 0 {
            mismatches += 1;
            first_mismatch.get_or_insert(i);
            max_abs_diff = max_abs_diff.max(d);
        }
    }

    Verification {
        equal: mismatches == 0,
        max_abs_diff,
        mismatches,
        first_mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_arrays() {
        let v = verify_equal(&[1, -2, 3], &[1, -2, 3]);
        assert!(v.equal);
        assert_eq!(v.max_abs_diff, 0);
        assert_eq!(v.mismatches, 0);
        assert_eq!(v.first_mismatch, None);
        assert_eq!(v.to_string(), "OK (max diff = 0)");
    }

    #[test]
    fn test_reports_largest_difference() {
        let v = verify_equal(&[0, 10, 20, 30], &[0, 13, 20, 25]);
        assert!(!v.equal);
        assert_eq!(v.max_abs_diff, 5);
        assert_eq!(v.mismatches, 2);
        assert_eq!(v.first_mismatch, Some(1));
    }

    #[test]
    fn test_extreme_difference_does_not_overflow() {
        let v = verify_equal(&[i16::MAX], &[i16::MIN]);
        assert_eq!(v.max_abs_diff, 65535);
        assert!(v.to_string().starts_with("FAIL (max diff = 65535)"));
    }

    #[test]
    fn test_empty_arrays_are_equal() {
        assert!(verify_equal(&[], &[]).equal);
    }

    #[test]
    #[should_panic(expected = "cannot compare")]
    fn test_length_mismatch_panics() {
        verify_equal(&[1, 2], &[1]);
    }
}

//! Multi-threaded Q15 AXPY
//!
//! Splits `y` into disjoint contiguous chunks with rayon and runs the selected
//! engine on each, with the matching chunks of `a` and `b` read shared. Since
//! every output element depends only on its own inputs the result is the same
//! as a single call.

use rayon::prelude::*;

use super::scalar::check_operands;
use super::{Vlmax, q15_axpy_with};
use crate::core::compute::simd_abstraction::simd::SimdEngineType;

/// Smallest chunk handed to a worker; below this the split costs more than it saves.
pub const MIN_PAR_CHUNK: usize = 1024;

/// Q15 AXPY across the current rayon pool, one chunk per worker.
pub fn q15_axpy_par(engine: SimdEngineType, a: &[i16], b: &[i16], y: &mut [i16], alpha: i16) {
    let n = check_operands(a, b, y);
    let chunk = n
        .div_ceil(rayon::current_num_threads().max(1))
        .max(MIN_PAR_CHUNK);
    q15_axpy_par_chunked(engine, a, b, y, alpha, chunk);
}

/// Q15 AXPY with an explicit chunk length.
///
/// # Panics
/// If `chunk_len` is zero or the slices differ in length.
pub fn q15_axpy_par_chunked(
    engine: SimdEngineType,
    a: &[i16],
    b: &[i16],
    y: &mut [i16],
    alpha: i16,
    chunk_len: usize,
) {
    assert!(chunk_len > 0, "chunk length must be nonzero");
    check_operands(a, b, y);

    // Resolve once so an unsupported engine warns once, not per chunk.
    let engine = if engine.is_available() {
        engine
    } else {
        log::warn!("{engine} is not supported on this CPU, using the scalar path");
        SimdEngineType::Scalar
    };

    log::debug!(
        "Parallel AXPY: {} samples in chunks of {} on {} threads",
        y.len(),
        chunk_len,
        rayon::current_num_threads()
    );

    y.par_chunks_mut(chunk_len)
        .zip(a.par_chunks(chunk_len))
        .zip(b.par_chunks(chunk_len))
        .for_each(|((y_chunk, a_chunk), b_chunk)| {
            q15_axpy_with(engine, a_chunk, b_chunk, y_chunk, alpha, &mut Vlmax);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::q15_axpy_ref;

    #[test]
    fn test_chunked_matches_reference() {
        let n = 10_007;
        let a: Vec<i16> = (0..n).map(|i| (i as i32 * 37 - 20000) as i16).collect();
        let b: Vec<i16> = (0..n).map(|i| (i as i32 * 911) as i16).collect();
        let mut y_ref = vec![0i16; n];
        q15_axpy_ref(&a, &b, &mut y_ref, 3);

        for chunk in [1, 7, 64, 1000, n, 2 * n] {
            let mut y = vec![0i16; n];
            q15_axpy_par_chunked(SimdEngineType::Portable { lanes: 16 }, &a, &b, &mut y, 3, chunk);
            assert_eq!(y, y_ref, "chunk length {chunk}");
        }
    }

    #[test]
    fn test_par_zero_length() {
        let mut y: Vec<i16> = Vec::new();
        q15_axpy_par(SimdEngineType::Scalar, &[], &[], &mut y, 3);
        assert!(y.is_empty());
    }

    #[test]
    #[should_panic(expected = "chunk length")]
    fn test_zero_chunk_panics() {
        let mut y = vec![0i16; 4];
        q15_axpy_par_chunked(SimdEngineType::Scalar, &[0; 4], &[0; 4], &mut y, 1, 0);
    }
}

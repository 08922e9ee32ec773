//! Q15 AXPY kernels and runtime dispatch
//!
//! `q15_axpy_ref` is the scalar oracle. `q15_axpy_with` runs the
//! vector-length-agnostic loop on a chosen lane engine, and `q15_axpy` does the
//! same on the engine detected for this CPU. Engines the CPU cannot run fall
//! back to the scalar path.

pub mod parallel;
pub mod scalar;
pub mod vla;

pub use parallel::{q15_axpy_par, q15_axpy_par_chunked};
pub use scalar::q15_axpy_ref;
pub use vla::{CappedVl, StepSchedule, VlPolicy, Vlmax};

use crate::core::compute::simd_abstraction::portable::PortableEngine;
use crate::core::compute::simd_abstraction::simd::{SimdEngineType, detected_simd_engine};

/// Q15 AXPY on the best engine for this CPU, full-width steps.
pub fn q15_axpy(a: &[i16], b: &[i16], y: &mut [i16], alpha: i16) {
    q15_axpy_with(detected_simd_engine(), a, b, y, alpha, &mut Vlmax);
}

/// Q15 AXPY on `engine`, asking `policy` for the width of every step.
///
/// Output is bit-identical to [`q15_axpy_ref`] for every engine and every
/// policy that honours the `VlPolicy` contract.
///
/// # Panics
/// If the slices differ in length or the policy returns an illegal width.
pub fn q15_axpy_with<P: VlPolicy + ?Sized>(
    engine: SimdEngineType,
    a: &[i16],
    b: &[i16],
    y: &mut [i16],
    alpha: i16,
    policy: &mut P,
) {
    if !engine.is_available() {
        log::warn!("{engine} is not supported on this CPU, using the scalar path");
        q15_axpy_ref(a, b, y, alpha);
        return;
    }

    match engine {
        SimdEngineType::Scalar => q15_axpy_ref(a, b, y, alpha),
        #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
        SimdEngineType::Engine128 => unsafe {
            // SSE2 and NEON are baseline on these targets
            vla::q15_axpy_vla(
                crate::core::compute::simd_abstraction::engine128::SimdEngine128,
                a,
                b,
                y,
                alpha,
                policy,
            )
        },
        #[cfg(target_arch = "x86_64")]
        SimdEngineType::Engine256 => unsafe { vla::q15_axpy_avx2(a, b, y, alpha, policy) },
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        SimdEngineType::Engine512 => unsafe { vla::q15_axpy_avx512(a, b, y, alpha, policy) },
        SimdEngineType::Portable { lanes } => match PortableEngine::new(lanes) {
            Some(portable) => unsafe { vla::q15_axpy_vla(portable, a, b, y, alpha, policy) },
            None => q15_axpy_ref(a, b, y, alpha),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_engine_matches_reference() {
        let a: Vec<i16> = (0..513).map(|i| (i * 131 - 30000) as i16).collect();
        let b: Vec<i16> = (0..513).map(|i| (i * 257 + 12345) as i16).collect();
        let mut y = vec![0i16; 513];
        let mut y_ref = vec![0i16; 513];
        q15_axpy_ref(&a, &b, &mut y_ref, 3);
        q15_axpy(&a, &b, &mut y, 3);
        assert_eq!(y, y_ref);
    }

    #[test]
    fn test_unavailable_portable_width_falls_back() {
        let a = [32767i16, 100];
        let b = [1i16, 10];
        let mut y = [0i16; 2];
        q15_axpy_with(SimdEngineType::Portable { lanes: 0 }, &a, &b, &mut y, 3, &mut Vlmax);
        assert_eq!(y, [32767, 130]);
    }
}

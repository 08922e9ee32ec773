// Enable unstable features for AVX-512 support (requires nightly Rust)
#![cfg_attr(feature = "avx512", feature(stdarch_x86_avx512))]
#![cfg_attr(feature = "avx512", feature(avx512_target_feature))]

pub mod bench; // Dataset generation, time sources and the verify/benchmark harness
pub mod core;
pub mod defaults;
pub mod kernels; // Scalar reference, VLA lane-parallel and rayon kernels
pub mod verify;

pub use crate::core::compute::simd_abstraction;
pub use crate::core::compute::simd_abstraction::simd::{
    SimdEngineType, detect_optimal_simd_engine, simd_engine_description,
};
pub use crate::core::q15::{Q15_MAX, Q15_MIN, Sample, saturate_q15};
pub use crate::kernels::{q15_axpy, q15_axpy_par, q15_axpy_ref, q15_axpy_with};
pub use crate::verify::{Verification, verify_equal};

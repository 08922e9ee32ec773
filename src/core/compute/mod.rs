pub mod simd_abstraction;

//! SIMD abstraction layer
//!
//! This module exposes the small set of lane operations the Q15 AXPY kernel
//! needs, hiding ISA differences between x86_64 (SSE2/AVX2/AVX‑512) and
//! aarch64 (NEON) behind the `LaneEngine` trait. A pure software engine with a
//! runtime lane count (`PortableEngine`) implements the same trait so the
//! vector-length-agnostic loop can be exercised at any register width.
//!
//! ## Engines and widths
//!
//! - `SimdEngine128`: 128‑bit vectors: 8 lanes of i16 (SSE2 on x86_64; NEON
//!   on aarch64)
//! - `SimdEngine256`: 256‑bit vectors: 16 lanes of i16 (AVX2 on x86_64)
//! - `SimdEngine512`: 512‑bit vectors: 32 lanes of i16 (AVX‑512BW on x86_64,
//!   `avx512` feature)
//! - `PortableEngine`: 1..=64 lanes of i16, chosen at runtime
//!
//! Every engine operates on one 16‑bit register (`Vec16`) and its widened
//! 32‑bit register group (`Vec32`, two native registers, i.e. LMUL=2 in RVV
//! terms).
//!
//! ## Runtime dispatch pattern
//!
//! 1) Detect features: `detect_optimal_simd_engine()`
//! 2) Dispatch: `kernels::q15_axpy_with()` matches on `SimdEngineType` and
//!    calls the monomorphised VLA loop for that engine
//!
//! ## Safety model
//!
//! All trait functions are `unsafe` because they may require specific CPU
//! features (AVX2, AVX‑512BW). Loads and stores take slices, so the memory
//! side is bounds-checked; callers only have to guarantee that the engine
//! matches the running CPU (`SimdEngineType::is_available`).

/// Lane facility used by the vector-length-agnostic AXPY loop.
///
/// `lanes()` is the maximum number of 16‑bit elements one step can process
/// (VLMAX). Every operation acts on all lanes; lanes beyond the active vector
/// length hold zeros after a partial load and are dropped by a partial store.
pub trait LaneEngine: Sized + Copy {
    /// Register of 16‑bit lanes.
    type Vec16: Copy;
    /// Register group of sign‑extended 32‑bit lanes (twice the width of `Vec16`).
    type Vec32: Copy;

    /// Number of 16‑bit lanes in `Vec16`.
    fn lanes(self) -> usize;

    // ===== Memory Operations =====

    /// Load `src.len()` contiguous samples into the low lanes, zeroing the rest.
    ///
    /// `src.len()` must not exceed `lanes()`.
    unsafe fn load_e16(self, src: &[i16]) -> Self::Vec16;

    /// Store the low `dst.len()` lanes of `v`; lanes past `dst.len()` are not written.
    ///
    /// `dst.len()` must not exceed `lanes()`.
    unsafe fn store_e16(self, dst: &mut [i16], v: Self::Vec16);

    // ===== Widening =====

    /// Sign‑extend every 16‑bit lane to 32 bits.
    unsafe fn widen_e16(self, v: Self::Vec16) -> Self::Vec32;

    /// Multiply every lane by `s`, producing exact 32‑bit products.
    unsafe fn widening_mul_e16(self, v: Self::Vec16, s: i16) -> Self::Vec32;

    // ===== 32-bit Integer Arithmetic =====

    /// Per‑lane wrapping add of 32‑bit lanes.
    unsafe fn add_e32(self, a: Self::Vec32, b: Self::Vec32) -> Self::Vec32;

    /// Per‑lane signed minimum against a broadcast scalar.
    unsafe fn min_e32(self, a: Self::Vec32, s: i32) -> Self::Vec32;

    /// Per‑lane signed maximum against a broadcast scalar.
    unsafe fn max_e32(self, a: Self::Vec32, s: i32) -> Self::Vec32;

    // ===== Narrowing =====

    /// Keep the low 16 bits of every 32‑bit lane (truncation, no rounding and
    /// no saturation).
    unsafe fn narrow_e32(self, v: Self::Vec32) -> Self::Vec16;
}

pub mod engine128;
pub mod engine256;
pub mod engine512;
pub mod portable;
pub mod simd;
pub mod types;

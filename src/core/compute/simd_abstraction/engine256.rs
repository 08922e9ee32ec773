//! 256‑bit SIMD engine (AVX2)
//!
//! This module provides the AVX2 implementation of the `LaneEngine` trait on
//! x86_64: 16 lanes of i16 per register, widened into two 8 × i32 registers.
//!
//! Highlights
//! - Widening uses `vpmovsxwd` on each 128‑bit half.
//! - AVX2 has no truncating 32→16 narrow. The low halves are sign‑extended in
//!   place so that `packs_epi32` cannot saturate, and the 128‑bit lane
//!   interleave introduced by `packs` is undone with a 64‑bit permute.
//! - All functions are `unsafe` and additionally annotated with
//!   `#[target_feature(enable = "avx2")]`. Callers must ensure AVX2 is
//!   available (the crate’s runtime dispatch does this for you).

#![cfg(target_arch = "x86_64")]

use super::LaneEngine;
use super::types::{simd_arch, stage_load, stage_store};

/// 256-bit SIMD engine (AVX2)
///
/// Provides 16-way parallelism for 16-bit samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimdEngine256;

impl SimdEngine256 {
    /// 256 bits ÷ 16 bits = 16 lanes
    pub const WIDTH_16: usize = 16;
}

#[allow(unsafe_op_in_unsafe_fn)]
impl LaneEngine for SimdEngine256 {
    type Vec16 = simd_arch::__m256i;
    type Vec32 = [simd_arch::__m256i; 2];

    #[inline(always)]
    fn lanes(self) -> usize {
        Self::WIDTH_16
    }

    // ===== Memory Operations =====

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn load_e16(self, src: &[i16]) -> Self::Vec16 {
        if src.len() == Self::WIDTH_16 {
            simd_arch::_mm256_loadu_si256(src.as_ptr() as *const simd_arch::__m256i)
        } else {
            let buf = stage_load::<16>(src);
            simd_arch::_mm256_loadu_si256(buf.as_ptr() as *const simd_arch::__m256i)
        }
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn store_e16(self, dst: &mut [i16], v: Self::Vec16) {
        if dst.len() == Self::WIDTH_16 {
            simd_arch::_mm256_storeu_si256(dst.as_mut_ptr() as *mut simd_arch::__m256i, v);
        } else {
            let mut buf = [0i16; 16];
            simd_arch::_mm256_storeu_si256(buf.as_mut_ptr() as *mut simd_arch::__m256i, v);
            stage_store(dst, &buf);
        }
    }

    // ===== Widening =====

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn widen_e16(self, v: Self::Vec16) -> Self::Vec32 {
        let lo = simd_arch::_mm256_castsi256_si128(v);
        let hi = simd_arch::_mm256_extracti128_si256(v, 1);
        [
            simd_arch::_mm256_cvtepi16_epi32(lo),
            simd_arch::_mm256_cvtepi16_epi32(hi),
        ]
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn widening_mul_e16(self, v: Self::Vec16, s: i16) -> Self::Vec32 {
        let k = simd_arch::_mm256_set1_epi32(s as i32);
        let [lo, hi] = self.widen_e16(v);
        [
            simd_arch::_mm256_mullo_epi32(lo, k),
            simd_arch::_mm256_mullo_epi32(hi, k),
        ]
    }

    // ===== 32-bit Integer Arithmetic =====

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn add_e32(self, a: Self::Vec32, b: Self::Vec32) -> Self::Vec32 {
        [
            simd_arch::_mm256_add_epi32(a[0], b[0]),
            simd_arch::_mm256_add_epi32(a[1], b[1]),
        ]
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn min_e32(self, a: Self::Vec32, s: i32) -> Self::Vec32 {
        let k = simd_arch::_mm256_set1_epi32(s);
        [
            simd_arch::_mm256_min_epi32(a[0], k),
            simd_arch::_mm256_min_epi32(a[1], k),
        ]
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn max_e32(self, a: Self::Vec32, s: i32) -> Self::Vec32 {
        let k = simd_arch::_mm256_set1_epi32(s);
        [
            simd_arch::_mm256_max_epi32(a[0], k),
            simd_arch::_mm256_max_epi32(a[1], k),
        ]
    }

    // ===== Narrowing =====

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn narrow_e32(self, v: Self::Vec32) -> Self::Vec16 {
        let lo = simd_arch::_mm256_srai_epi32(simd_arch::_mm256_slli_epi32(v[0], 16), 16);
        let hi = simd_arch::_mm256_srai_epi32(simd_arch::_mm256_slli_epi32(v[1], 16), 16);
        // packs leaves [lo.0, hi.0, lo.1, hi.1] in 64-bit units
        let packed = simd_arch::_mm256_packs_epi32(lo, hi);
        simd_arch::_mm256_permute4x64_epi64(packed, 0b11_01_10_00)
    }
}

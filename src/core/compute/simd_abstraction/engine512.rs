//! 512‑bit SIMD engine (AVX‑512F/BW)
//!
//! Compiled only with the `avx512` cargo feature on x86_64. One register holds
//! 32 lanes of i16; the widened group is two 16 × i32 registers. AVX‑512 has a
//! native truncating narrow (`vpmovdw`), so no pack fixups are needed here.

#![cfg(all(target_arch = "x86_64", feature = "avx512"))]

use super::LaneEngine;
use super::types::{simd_arch, stage_load, stage_store};

/// 512-bit SIMD engine (AVX-512BW)
///
/// Provides 32-way parallelism for 16-bit samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimdEngine512;

impl SimdEngine512 {
    /// 512 bits ÷ 16 bits = 32 lanes
    pub const WIDTH_16: usize = 32;
}

#[allow(unsafe_op_in_unsafe_fn)]
impl LaneEngine for SimdEngine512 {
    type Vec16 = simd_arch::__m512i;
    type Vec32 = [simd_arch::__m512i; 2];

    #[inline(always)]
    fn lanes(self) -> usize {
        Self::WIDTH_16
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn load_e16(self, src: &[i16]) -> Self::Vec16 {
        if src.len() == Self::WIDTH_16 {
            simd_arch::_mm512_loadu_si512(src.as_ptr().cast())
        } else {
            let buf = stage_load::<32>(src);
            simd_arch::_mm512_loadu_si512(buf.as_ptr().cast())
        }
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn store_e16(self, dst: &mut [i16], v: Self::Vec16) {
        if dst.len() == Self::WIDTH_16 {
            simd_arch::_mm512_storeu_si512(dst.as_mut_ptr().cast(), v);
        } else {
            let mut buf = [0i16; 32];
            simd_arch::_mm512_storeu_si512(buf.as_mut_ptr().cast(), v);
            stage_store(dst, &buf);
        }
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn widen_e16(self, v: Self::Vec16) -> Self::Vec32 {
        let lo = simd_arch::_mm512_castsi512_si256(v);
        let hi = simd_arch::_mm512_extracti64x4_epi64(v, 1);
        [
            simd_arch::_mm512_cvtepi16_epi32(lo),
            simd_arch::_mm512_cvtepi16_epi32(hi),
        ]
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn widening_mul_e16(self, v: Self::Vec16, s: i16) -> Self::Vec32 {
        let k = simd_arch::_mm512_set1_epi32(s as i32);
        let [lo, hi] = self.widen_e16(v);
        [
            simd_arch::_mm512_mullo_epi32(lo, k),
            simd_arch::_mm512_mullo_epi32(hi, k),
        ]
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn add_e32(self, a: Self::Vec32, b: Self::Vec32) -> Self::Vec32 {
        [
            simd_arch::_mm512_add_epi32(a[0], b[0]),
            simd_arch::_mm512_add_epi32(a[1], b[1]),
        ]
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn min_e32(self, a: Self::Vec32, s: i32) -> Self::Vec32 {
        let k = simd_arch::_mm512_set1_epi32(s);
        [
            simd_arch::_mm512_min_epi32(a[0], k),
            simd_arch::_mm512_min_epi32(a[1], k),
        ]
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn max_e32(self, a: Self::Vec32, s: i32) -> Self::Vec32 {
        let k = simd_arch::_mm512_set1_epi32(s);
        [
            simd_arch::_mm512_max_epi32(a[0], k),
            simd_arch::_mm512_max_epi32(a[1], k),
        ]
    }

    #[inline]
    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn narrow_e32(self, v: Self::Vec32) -> Self::Vec16 {
        let lo = simd_arch::_mm512_cvtepi32_epi16(v[0]);
        let hi = simd_arch::_mm512_cvtepi32_epi16(v[1]);
        simd_arch::_mm512_inserti64x4(simd_arch::_mm512_castsi256_si512(lo), hi, 1)
    }
}

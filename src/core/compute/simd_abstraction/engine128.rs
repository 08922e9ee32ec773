//! 128‑bit SIMD engine (SSE2 on x86_64; NEON on aarch64)
//!
//! This module implements the 128‑bit `LaneEngine` backend: 8 lanes of i16 per
//! register, widened into a pair of 4 × i32 registers. SSE2 and NEON are part
//! of the baseline of their architectures, so this engine is always available
//! on x86_64 and aarch64 and no `target_feature` attribute is needed.
//!
//! Highlights
//! - SSE2 has no 32‑bit multiply, so the widening multiply is built from
//!   `mullo`/`mulhi` on 16‑bit lanes and an unpack of the two halves, which
//!   yields the exact 32‑bit products.
//! - SSE2 has no 32‑bit min/max either; both are a compare plus a bitwise
//!   select.
//! - The truncating narrow sign‑extends the low half of every lane first
//!   (`slli`/`srai` by 16) so that `packs_epi32` never saturates. NEON's
//!   `vmovn` truncates natively.

#![cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]

use super::LaneEngine;
use super::types::{simd_arch, stage_load, stage_store};

/// 128-bit SIMD engine (SSE2 on x86_64, NEON on aarch64)
///
/// Provides 8-way parallelism for 16-bit samples. This is the baseline SIMD
/// implementation that works on all supported CPUs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimdEngine128;

impl SimdEngine128 {
    /// 128 bits ÷ 16 bits = 8 lanes
    pub const WIDTH_16: usize = 8;
}

#[allow(unsafe_op_in_unsafe_fn)]
impl LaneEngine for SimdEngine128 {
    #[cfg(target_arch = "x86_64")]
    type Vec16 = simd_arch::__m128i;
    #[cfg(target_arch = "x86_64")]
    type Vec32 = [simd_arch::__m128i; 2];

    #[cfg(target_arch = "aarch64")]
    type Vec16 = simd_arch::int16x8_t;
    #[cfg(target_arch = "aarch64")]
    type Vec32 = [simd_arch::int32x4_t; 2];

    #[inline(always)]
    fn lanes(self) -> usize {
        Self::WIDTH_16
    }

    // ===== Memory Operations =====

    #[inline]
    unsafe fn load_e16(self, src: &[i16]) -> Self::Vec16 {
        if src.len() == Self::WIDTH_16 {
            #[cfg(target_arch = "x86_64")]
            {
                simd_arch::_mm_loadu_si128(src.as_ptr() as *const simd_arch::__m128i)
            }
            #[cfg(target_arch = "aarch64")]
            {
                simd_arch::vld1q_s16(src.as_ptr())
            }
        } else {
            let buf = stage_load::<8>(src);
            #[cfg(target_arch = "x86_64")]
            {
                simd_arch::_mm_loadu_si128(buf.as_ptr() as *const simd_arch::__m128i)
            }
            #[cfg(target_arch = "aarch64")]
            {
                simd_arch::vld1q_s16(buf.as_ptr())
            }
        }
    }

    #[inline]
    unsafe fn store_e16(self, dst: &mut [i16], v: Self::Vec16) {
        if dst.len() == Self::WIDTH_16 {
            #[cfg(target_arch = "x86_64")]
            simd_arch::_mm_storeu_si128(dst.as_mut_ptr() as *mut simd_arch::__m128i, v);
            #[cfg(target_arch = "aarch64")]
            simd_arch::vst1q_s16(dst.as_mut_ptr(), v);
        } else {
            let mut buf = [0i16; 8];
            #[cfg(target_arch = "x86_64")]
            simd_arch::_mm_storeu_si128(buf.as_mut_ptr() as *mut simd_arch::__m128i, v);
            #[cfg(target_arch = "aarch64")]
            simd_arch::vst1q_s16(buf.as_mut_ptr(), v);
            stage_store(dst, &buf);
        }
    }

    // ===== Widening =====

    #[inline]
    unsafe fn widen_e16(self, v: Self::Vec16) -> Self::Vec32 {
        #[cfg(target_arch = "x86_64")]
        {
            // Duplicate each lane into both halves of a 32-bit slot, then an
            // arithmetic shift keeps the sign-extended high copy.
            let lo = simd_arch::_mm_srai_epi32(simd_arch::_mm_unpacklo_epi16(v, v), 16);
            let hi = simd_arch::_mm_srai_epi32(simd_arch::_mm_unpackhi_epi16(v, v), 16);
            [lo, hi]
        }
        #[cfg(target_arch = "aarch64")]
        {
            [
                simd_arch::vmovl_s16(simd_arch::vget_low_s16(v)),
                simd_arch::vmovl_high_s16(v),
            ]
        }
    }

    #[inline]
    unsafe fn widening_mul_e16(self, v: Self::Vec16, s: i16) -> Self::Vec32 {
        #[cfg(target_arch = "x86_64")]
        {
            let k = simd_arch::_mm_set1_epi16(s);
            let prod_lo16 = simd_arch::_mm_mullo_epi16(v, k);
            let prod_hi16 = simd_arch::_mm_mulhi_epi16(v, k);
            [
                simd_arch::_mm_unpacklo_epi16(prod_lo16, prod_hi16),
                simd_arch::_mm_unpackhi_epi16(prod_lo16, prod_hi16),
            ]
        }
        #[cfg(target_arch = "aarch64")]
        {
            [
                simd_arch::vmull_n_s16(simd_arch::vget_low_s16(v), s),
                simd_arch::vmull_high_n_s16(v, s),
            ]
        }
    }

    // ===== 32-bit Integer Arithmetic =====

    #[inline]
    unsafe fn add_e32(self, a: Self::Vec32, b: Self::Vec32) -> Self::Vec32 {
        #[cfg(target_arch = "x86_64")]
        {
            [
                simd_arch::_mm_add_epi32(a[0], b[0]),
                simd_arch::_mm_add_epi32(a[1], b[1]),
            ]
        }
        #[cfg(target_arch = "aarch64")]
        {
            [simd_arch::vaddq_s32(a[0], b[0]), simd_arch::vaddq_s32(a[1], b[1])]
        }
    }

    #[inline]
    unsafe fn min_e32(self, a: Self::Vec32, s: i32) -> Self::Vec32 {
        #[cfg(target_arch = "x86_64")]
        {
            let k = simd_arch::_mm_set1_epi32(s);
            [sse2_select_gt(a[0], k), sse2_select_gt(a[1], k)]
        }
        #[cfg(target_arch = "aarch64")]
        {
            let k = simd_arch::vdupq_n_s32(s);
            [simd_arch::vminq_s32(a[0], k), simd_arch::vminq_s32(a[1], k)]
        }
    }

    #[inline]
    unsafe fn max_e32(self, a: Self::Vec32, s: i32) -> Self::Vec32 {
        #[cfg(target_arch = "x86_64")]
        {
            let k = simd_arch::_mm_set1_epi32(s);
            [sse2_select_lt(a[0], k), sse2_select_lt(a[1], k)]
        }
        #[cfg(target_arch = "aarch64")]
        {
            let k = simd_arch::vdupq_n_s32(s);
            [simd_arch::vmaxq_s32(a[0], k), simd_arch::vmaxq_s32(a[1], k)]
        }
    }

    // ===== Narrowing =====

    #[inline]
    unsafe fn narrow_e32(self, v: Self::Vec32) -> Self::Vec16 {
        #[cfg(target_arch = "x86_64")]
        {
            let lo = simd_arch::_mm_srai_epi32(simd_arch::_mm_slli_epi32(v[0], 16), 16);
            let hi = simd_arch::_mm_srai_epi32(simd_arch::_mm_slli_epi32(v[1], 16), 16);
            simd_arch::_mm_packs_epi32(lo, hi)
        }
        #[cfg(target_arch = "aarch64")]
        {
            simd_arch::vmovn_high_s32(simd_arch::vmovn_s32(v[0]), v[1])
        }
    }
}

/// `min(v, k)` per 32-bit lane: where `v > k` take `k`, else keep `v`.
#[cfg(target_arch = "x86_64")]
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn sse2_select_gt(v: simd_arch::__m128i, k: simd_arch::__m128i) -> simd_arch::__m128i {
    let gt = simd_arch::_mm_cmpgt_epi32(v, k);
    simd_arch::_mm_or_si128(
        simd_arch::_mm_and_si128(gt, k),
        simd_arch::_mm_andnot_si128(gt, v),
    )
}

/// `max(v, k)` per 32-bit lane: where `v < k` take `k`, else keep `v`.
#[cfg(target_arch = "x86_64")]
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn sse2_select_lt(v: simd_arch::__m128i, k: simd_arch::__m128i) -> simd_arch::__m128i {
    let lt = simd_arch::_mm_cmplt_epi32(v, k);
    simd_arch::_mm_or_si128(
        simd_arch::_mm_and_si128(lt, k),
        simd_arch::_mm_andnot_si128(lt, v),
    )
}

//! Vector-length-agnostic Q15 AXPY loop
//!
//! The loop never assumes a register width. Each step asks a [`VlPolicy`] how
//! many elements to process (`vl`), given how many remain (AVL) and how many
//! the engine can hold (VLMAX), the same contract as RVV `vsetvl`. The last
//! step of an array whose length is not a multiple of the lane count simply
//! gets a smaller `vl`; there is no separate scalar tail.
//!
//! Per step:
//! 1. load `vl` lanes of `a` and `b` (inactive lanes read as zero)
//! 2. `acc = widen(a) + widening_mul(b, alpha)` in 32-bit lanes
//! 3. `acc = max(min(acc, 32767), -32768)`
//! 4. narrow by truncation and store `vl` lanes of `y`

use std::num::NonZeroUsize;

use super::scalar::check_operands;
use crate::core::compute::simd_abstraction::LaneEngine;
use crate::core::q15::{Q15_MAX, Q15_MIN};

/// Per-step vector length selection.
pub trait VlPolicy {
    /// Number of elements to process this step.
    ///
    /// `avl` is the number of elements left (always > 0) and `vlmax` the lane
    /// count of the engine. The result must satisfy `0 < vl <= min(avl, vlmax)`;
    /// the kernel asserts it.
    fn vsetvl(&mut self, avl: usize, vlmax: usize) -> usize;
}

/// Use every lane the engine has (`vl = min(avl, vlmax)`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vlmax;

impl VlPolicy for Vlmax {
    #[inline(always)]
    fn vsetvl(&mut self, avl: usize, vlmax: usize) -> usize {
        avl.min(vlmax)
    }
}

/// Never process more than `cap` elements per step, as a narrower machine would.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CappedVl(pub NonZeroUsize);

impl CappedVl {
    /// Returns `None` for a zero cap.
    pub fn new(cap: usize) -> Option<Self> {
        NonZeroUsize::new(cap).map(Self)
    }
}

impl VlPolicy for CappedVl {
    #[inline(always)]
    fn vsetvl(&mut self, avl: usize, vlmax: usize) -> usize {
        avl.min(vlmax).min(self.0.get())
    }
}

/// Cycle through a fixed list of requested widths, one per step.
///
/// Each request is clamped to `min(avl, vlmax)`, so `vl` changes from step to
/// step while staying legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSchedule {
    widths: Vec<usize>,
    next: usize,
}

impl StepSchedule {
    /// # Panics
    /// If `widths` is empty or contains a zero.
    pub fn new(widths: Vec<usize>) -> Self {
        assert!(!widths.is_empty(), "step schedule needs at least one width");
        assert!(
            widths.iter().all(|&w| w > 0),
            "step schedule widths must be nonzero: {widths:?}"
        );
        Self { widths, next: 0 }
    }
}

impl VlPolicy for StepSchedule {
    fn vsetvl(&mut self, avl: usize, vlmax: usize) -> usize {
        let w = self.widths[self.next];
        self.next = (self.next + 1) % self.widths.len();
        w.min(avl).min(vlmax)
    }
}

/// Q15 AXPY over `engine`, stepping with `policy`.
///
/// # Safety
/// `engine` must be supported by the running CPU (see
/// `SimdEngineType::is_available`).
///
/// # Panics
/// If the slices differ in length, or if `policy` returns a width outside
/// `1..=min(avl, vlmax)`.
#[inline(always)]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn q15_axpy_vla<E: LaneEngine, P: VlPolicy + ?Sized>(
    engine: E,
    a: &[i16],
    b: &[i16],
    y: &mut [i16],
    alpha: i16,
    policy: &mut P,
) {
    let n = check_operands(a, b, y);
    let vlmax = engine.lanes();

    let mut i = 0;
    while i < n {
        let avl = n - i;
        let vl = policy.vsetvl(avl, vlmax);
        assert!(
            vl > 0 && vl <= avl && vl <= vlmax,
            "invalid vector length {vl} (avl={avl}, vlmax={vlmax})"
        );

        let va = engine.load_e16(&a[i..i + vl]);
        let vb = engine.load_e16(&b[i..i + vl]);

        let prod = engine.widening_mul_e16(vb, alpha);
        let acc = engine.add_e32(engine.widen_e16(va), prod);
        let acc = engine.min_e32(acc, Q15_MAX as i32);
        let acc = engine.max_e32(acc, Q15_MIN as i32);

        let out = engine.narrow_e32(acc);
        engine.store_e16(&mut y[i..i + vl], out);

        i += vl;
    }
}

/// Generate a `#[target_feature]` entry point that monomorphises
/// [`q15_axpy_vla`] for one engine, so the engine's primitives inline into a
/// body compiled with the matching features.
#[macro_export]
macro_rules! generate_axpy_entry {
    (
        name = $name:ident,
        engine = $E:expr,
        cfg = $cfg:meta,
        target_feature = $tf:literal,
    ) => {
        #[$cfg]
        #[target_feature(enable = $tf)]
        #[allow(unsafe_op_in_unsafe_fn)]
        pub unsafe fn $name<P: $crate::kernels::vla::VlPolicy + ?Sized>(
            a: &[i16],
            b: &[i16],
            y: &mut [i16],
            alpha: i16,
            policy: &mut P,
        ) {
            $crate::kernels::vla::q15_axpy_vla($E, a, b, y, alpha, policy)
        }
    };
}

generate_axpy_entry!(
    name = q15_axpy_avx2,
    engine = crate::core::compute::simd_abstraction::engine256::SimdEngine256,
    cfg = cfg(target_arch = "x86_64"),
    target_feature = "avx2",
);

generate_axpy_entry!(
    name = q15_axpy_avx512,
    engine = crate::core::compute::simd_abstraction::engine512::SimdEngine512,
    cfg = cfg(all(target_arch = "x86_64", feature = "avx512")),
    target_feature = "avx512f,avx512bw",
);

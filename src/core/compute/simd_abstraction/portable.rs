//! Portable software lanes with a runtime register width
//!
//! `PortableEngine` models a vector unit whose register length is only known
//! at runtime, the way an RVV core reports `VLEN`. With 16‑bit elements and
//! one register per operand (`e16,m1`) the engine holds `VLEN / 16` lanes.
//! It is plain Rust, so it runs on every target, and it lets the VLA kernel be
//! exercised at register widths no host ISA offers (1, 3, 24, 64 lanes, ...).

use super::LaneEngine;

/// Largest lane count the portable engine supports (VLEN = 1024 bits).
pub const PORTABLE_MAX_LANES: usize = 64;

/// Software vector unit with `lanes` 16‑bit lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortableEngine {
    lanes: usize,
}

impl PortableEngine {
    /// Create an engine with `lanes` lanes.
    ///
    /// Returns `None` unless `1 <= lanes <= PORTABLE_MAX_LANES`.
    pub fn new(lanes: usize) -> Option<Self> {
        (1..=PORTABLE_MAX_LANES)
            .contains(&lanes)
            .then_some(Self { lanes })
    }

    /// Create an engine from a vector register length in bits (`e16,m1`).
    ///
    /// `vlen_bits` must be a positive multiple of 16 no larger than 1024.
    pub fn from_vlen_bits(vlen_bits: usize) -> Option<Self> {
        if vlen_bits % 16 != 0 {
            return None;
        }
        Self::new(vlen_bits / 16)
    }

    /// Register length in bits.
    pub fn vlen_bits(&self) -> usize {
        self.lanes * 16
    }
}

impl LaneEngine for PortableEngine {
    type Vec16 = [i16; PORTABLE_MAX_LANES];
    type Vec32 = [i32; PORTABLE_MAX_LANES];

    #[inline(always)]
    fn lanes(self) -> usize {
        self.lanes
    }

    #[inline]
    unsafe fn load_e16(self, src: &[i16]) -> Self::Vec16 {
        assert!(src.len() <= self.lanes, "load of {} exceeds {} lanes", src.len(), self.lanes);
        let mut v = [0i16; PORTABLE_MAX_LANES];
        v[..src.len()].copy_from_slice(src);
        v
    }

    #[inline]
    unsafe fn store_e16(self, dst: &mut [i16], v: Self::Vec16) {
        assert!(dst.len() <= self.lanes, "store of {} exceeds {} lanes", dst.len(), self.lanes);
        let len = dst.len();
        dst.copy_from_slice(&v[..len]);
    }

    #[inline]
    unsafe fn widen_e16(self, v: Self::Vec16) -> Self::Vec32 {
        let mut out = [0i32; PORTABLE_MAX_LANES];
        for (o, &x) in out[..self.lanes].iter_mut().zip(&v[..self.lanes]) {
            *o = x as i32;
        }
        out
    }

    #[inline]
    unsafe fn widening_mul_e16(self, v: Self::Vec16, s: i16) -> Self::Vec32 {
        let mut out = [0i32; PORTABLE_MAX_LANES];
        for (o, &x) in out[..self.lanes].iter_mut().zip(&v[..self.lanes]) {
            *o = x as i32 * s as i32;
        }
        out
    }

    #[inline]
    unsafe fn add_e32(self, mut a: Self::Vec32, b: Self::Vec32) -> Self::Vec32 {
        for (x, &y) in a[..self.lanes].iter_mut().zip(&b[..self.lanes]) {
            *x = x.wrapping_add(y);
        }
        a
    }

    #[inline]
    unsafe fn min_e32(self, mut a: Self::Vec32, s: i32) -> Self::Vec32 {
        for x in &mut a[..self.lanes] {
            *x = (*x).min(s);
        }
        a
    }

    #[inline]
    unsafe fn max_e32(self, mut a: Self::Vec32, s: i32) -> Self::Vec32 {
        for x in &mut a[..self.lanes] {
            *x = (*x).max(s);
        }
        a
    }

    #[inline]
    unsafe fn narrow_e32(self, v: Self::Vec32) -> Self::Vec16 {
        let mut out = [0i16; PORTABLE_MAX_LANES];
        for (o, &x) in out[..self.lanes].iter_mut().zip(&v[..self.lanes]) {
            *o = x as i16;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portable_engine_lane_bounds() {
        assert!(PortableEngine::new(0).is_none());
        assert!(PortableEngine::new(PORTABLE_MAX_LANES + 1).is_none());
        assert_eq!(PortableEngine::new(1).map(|e| e.lanes()), Some(1));
        assert_eq!(PortableEngine::new(64).map(|e| e.lanes()), Some(64));
    }

    #[test]
    fn test_portable_engine_from_vlen() {
        assert_eq!(PortableEngine::from_vlen_bits(128).map(|e| e.lanes()), Some(8));
        assert_eq!(PortableEngine::from_vlen_bits(256).map(|e| e.lanes()), Some(16));
        assert_eq!(PortableEngine::from_vlen_bits(1024).map(|e| e.lanes()), Some(64));
        assert!(PortableEngine::from_vlen_bits(0).is_none());
        assert!(PortableEngine::from_vlen_bits(100).is_none());
        assert!(PortableEngine::from_vlen_bits(2048).is_none());
    }
}

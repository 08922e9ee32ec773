//! Architecture bindings and staging helpers shared by the engines
//!
//! - On x86_64 we re-export `std::arch::x86_64` as `simd_arch`.
//! - On aarch64 we re-export `std::arch::aarch64` as `simd_arch`.
//!
//! Partial chunks (the tail of the VLA loop, or any step where the policy
//! picked fewer lanes than the register holds) go through a zeroed stack
//! buffer of full register width so every engine can keep using plain
//! unaligned loads and stores.

#[cfg(target_arch = "x86_64")]
pub use std::arch::x86_64 as simd_arch;

#[cfg(target_arch = "aarch64")]
pub use std::arch::aarch64 as simd_arch;

/// Copy `src` into the low lanes of a zeroed `N`‑lane buffer.
#[inline]
pub fn stage_load<const N: usize>(src: &[i16]) -> [i16; N] {
    assert!(
        src.len() <= N,
        "chunk of {} samples exceeds {} lanes",
        src.len(),
        N
    );
    let mut buf = [0i16; N];
    buf[..src.len()].copy_from_slice(src);
    buf
}

/// Copy the low `dst.len()` lanes of a staged register image into `dst`.
#[inline]
pub fn stage_store<const N: usize>(dst: &mut [i16], buf: &[i16; N]) {
    assert!(
        dst.len() <= N,
        "chunk of {} samples exceeds {} lanes",
        dst.len(),
        N
    );
    let len = dst.len();
    dst.copy_from_slice(&buf[..len]);
}

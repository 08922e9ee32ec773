//! Core reusable components for Q15 vector arithmetic.
//!
//! This module holds the fixed-point sample definitions and the lane-engine
//! abstraction shared by every kernel.

pub mod compute;
pub mod q15;

// src/defaults.rs

// Workload Constants
pub const LEN: usize = 4096;
pub const SEED: u64 = 1234;
pub const ALPHA: i16 = 3;

// Simulated Vector Unit
pub const VLEN_BITS: usize = 256;

// Other Constants
pub const THREADS: usize = 1;
pub const VERBOSITY: i32 = 3;

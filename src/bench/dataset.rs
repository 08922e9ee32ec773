//! Deterministic benchmark inputs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The two operand arrays of one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub a: Vec<i16>,
    pub b: Vec<i16>,
}

impl Dataset {
    /// Draw `len` pairs from a generator seeded with `seed`.
    ///
    /// Samples are uniform over the full `i16` range and drawn interleaved,
    /// `a[i]` then `b[i]`, so the same seed always yields the same arrays.
    pub fn generate(len: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut a = Vec::with_capacity(len);
        let mut b = Vec::with_capacity(len);
        for _ in 0..len {
            a.push(rng.gen_range(i16::MIN..=i16::MAX));
            b.push(rng.gen_range(i16::MIN..=i16::MAX));
        }
        Self { a, b }
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }
}

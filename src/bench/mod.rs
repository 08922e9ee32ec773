//! Verification / benchmark harness
//!
//! Generates a seeded dataset, runs the scalar reference and the lane-parallel
//! kernel on it into separate output buffers, costs each run with an injected
//! [`TimeSource`], and compares the outputs.

pub mod clock;
pub mod dataset;

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

pub use clock::{ClockKind, CycleCounter, MonotonicClock, TimeSource, TimeUnit, cputime};
pub use dataset::Dataset;

use crate::core::compute::simd_abstraction::portable::PortableEngine;
use crate::core::compute::simd_abstraction::simd::{
    SimdEngineType, detected_simd_engine, simd_engine_description,
};
use crate::defaults;
use crate::kernels::{CappedVl, Vlmax, q15_axpy_par, q15_axpy_ref, q15_axpy_with};
use crate::verify::{Verification, verify_equal};

/// Engine requested on the command line, before checking the CPU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineChoice {
    #[default]
    Auto,
    Scalar,
    Engine128,
    Engine256,
    Engine512,
    Portable,
}

impl FromStr for EngineChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(EngineChoice::Auto),
            "scalar" => Ok(EngineChoice::Scalar),
            "engine128" | "sse" | "sse2" | "neon" => Ok(EngineChoice::Engine128),
            "engine256" | "avx2" => Ok(EngineChoice::Engine256),
            "engine512" | "avx512" => Ok(EngineChoice::Engine512),
            "portable" => Ok(EngineChoice::Portable),
            other => anyhow::bail!(
                "unknown engine '{}' (expected auto, scalar, engine128, engine256, engine512 or portable)",
                other
            ),
        }
    }
}

impl EngineChoice {
    /// Map the choice to an engine this build and this CPU can run.
    ///
    /// `vlen_bits` is only used for `Portable`.
    pub fn resolve(self, vlen_bits: usize) -> anyhow::Result<SimdEngineType> {
        let engine = match self {
            EngineChoice::Auto => return Ok(detected_simd_engine()),
            EngineChoice::Scalar => SimdEngineType::Scalar,
            EngineChoice::Portable => match PortableEngine::from_vlen_bits(vlen_bits) {
                Some(p) => SimdEngineType::Portable {
                    lanes: p.vlen_bits() / 16,
                },
                None => anyhow::bail!(
                    "invalid VLEN {} bits: must be a positive multiple of 16 up to {}",
                    vlen_bits,
                    crate::core::compute::simd_abstraction::portable::PORTABLE_MAX_LANES * 16
                ),
            },
            EngineChoice::Engine128 => {
                #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
                {
                    SimdEngineType::Engine128
                }
                #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
                {
                    anyhow::bail!("128-bit engine requires x86_64 or aarch64")
                }
            }
            EngineChoice::Engine256 => {
                #[cfg(target_arch = "x86_64")]
                {
                    SimdEngineType::Engine256
                }
                #[cfg(not(target_arch = "x86_64"))]
                {
                    anyhow::bail!("256-bit engine requires x86_64")
                }
            }
            EngineChoice::Engine512 => {
                #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
                {
                    SimdEngineType::Engine512
                }
                #[cfg(not(all(target_arch = "x86_64", feature = "avx512")))]
                {
                    anyhow::bail!("512-bit engine requires x86_64 and a build with --features avx512")
                }
            }
        };

        if !engine.is_available() {
            anyhow::bail!("{} is not supported on this CPU", simd_engine_description(engine));
        }
        Ok(engine)
    }
}

/// One harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub len: usize,
    pub seed: u64,
    pub alpha: i16,
    pub engine: SimdEngineType,
    /// Cap on elements per step; `None` uses every lane.
    pub max_vl: Option<NonZeroUsize>,
    /// Worker threads for the lane-parallel run; 1 stays on the calling thread.
    pub threads: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            len: defaults::LEN,
            seed: defaults::SEED,
            alpha: defaults::ALPHA,
            engine: detected_simd_engine(),
            max_vl: None,
            threads: defaults::THREADS,
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.threads == 0 {
            anyhow::bail!("thread count must be at least 1");
        }
        if !self.engine.is_available() {
            anyhow::bail!("{} is not supported on this CPU", self.engine);
        }
        if self.threads > 1 && self.max_vl.is_some() {
            log::warn!("--max-vl is ignored by the multi-threaded run");
        }
        Ok(())
    }
}

/// Result of one harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchReport {
    pub engine: SimdEngineType,
    pub len: usize,
    pub alpha: i16,
    pub verification: Verification,
    pub ref_cost: u64,
    pub vec_cost: u64,
    pub unit: TimeUnit,
}

impl BenchReport {
    /// `ref_cost / vec_cost`; a zero vector cost counts as one unit.
    pub fn speedup(&self) -> f64 {
        self.ref_cost as f64 / self.vec_cost.max(1) as f64
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.unit {
            TimeUnit::Cycles => "Cycles",
            TimeUnit::Nanos => "Nanoseconds",
        };
        writeln!(f, "Engine: {}", self.engine)?;
        writeln!(f, "Samples: {}, alpha: {}", self.len, self.alpha)?;
        writeln!(f, "{} ref: {}", label, self.ref_cost)?;
        writeln!(f, "Verify vector: {}", self.verification)?;
        writeln!(f, "{} vector: {}", label, self.vec_cost)?;
        write!(f, "Speedup: {:.2}x", self.speedup())
    }
}

/// Run the reference and lane-parallel kernels once each and compare them.
pub fn run_benchmark(config: &BenchConfig, clock: &dyn TimeSource) -> anyhow::Result<BenchReport> {
    config.validate()?;

    let data = Dataset::generate(config.len, config.seed);
    log::debug!(
        "Generated {} samples (seed {}), alpha = {}",
        data.len(),
        config.seed,
        config.alpha
    );

    let mut y_ref = vec![0i16; config.len];
    let mut y_vec = vec![0i16; config.len];

    let t0 = clock.now();
    q15_axpy_ref(&data.a, &data.b, &mut y_ref, config.alpha);
    let t1 = clock.now();
    let ref_cost = t1.saturating_sub(t0);

    let t0 = clock.now();
    if config.threads > 1 {
        q15_axpy_par(config.engine, &data.a, &data.b, &mut y_vec, config.alpha);
    } else if let Some(cap) = config.max_vl {
        q15_axpy_with(config.engine, &data.a, &data.b, &mut y_vec, config.alpha, &mut CappedVl(cap));
    } else {
        q15_axpy_with(config.engine, &data.a, &data.b, &mut y_vec, config.alpha, &mut Vlmax);
    }
    let t1 = clock.now();
    let vec_cost = t1.saturating_sub(t0);

    let verification = verify_equal(&y_ref, &y_vec);
    if verification.equal {
        log::debug!("Vector output matches reference");
    } else {
        log::error!("Vector output differs from reference: {}", verification);
    }

    Ok(BenchReport {
        engine: config.engine,
        len: config.len,
        alpha: config.alpha,
        verification,
        ref_cost,
        vec_cost,
        unit: clock.unit(),
    })
}

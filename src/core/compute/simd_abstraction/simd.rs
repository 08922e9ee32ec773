//! Module for runtime SIMD engine detection and management.
//!
//! This module provides functionality to detect the optimal lane engine
//! available on the CPU at runtime and to retrieve associated metadata
//! like human-readable descriptions and lane counts.

use std::fmt;
use std::sync::OnceLock;

/// Available lane engines based on CPU capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdEngineType {
    /// No lane facility: the AXPY kernel runs the scalar reference path
    Scalar,
    /// 128-bit SIMD (SSE2/NEON) - always available on x86_64 and aarch64
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    Engine128,
    /// 256-bit SIMD (AVX2) - x86_64 only
    #[cfg(target_arch = "x86_64")]
    Engine256,
    /// 512-bit SIMD (AVX-512) - x86_64 only (requires avx512 feature flag)
    #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
    Engine512,
    /// Software lanes with a runtime lane count (simulated vector length)
    Portable {
        /// Number of 16-bit lanes, `1..=PORTABLE_MAX_LANES`
        lanes: usize,
    },
}

impl SimdEngineType {
    /// Maximum number of 16-bit elements one step of this engine processes.
    ///
    /// The scalar path handles one element at a time.
    pub fn lanes(self) -> usize {
        match self {
            SimdEngineType::Scalar => 1,
            #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
            SimdEngineType::Engine128 => super::engine128::SimdEngine128::WIDTH_16,
            #[cfg(target_arch = "x86_64")]
            SimdEngineType::Engine256 => super::engine256::SimdEngine256::WIDTH_16,
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            SimdEngineType::Engine512 => super::engine512::SimdEngine512::WIDTH_16,
            SimdEngineType::Portable { lanes } => lanes,
        }
    }

    /// Whether the running CPU can execute this engine.
    pub fn is_available(self) -> bool {
        match self {
            SimdEngineType::Scalar => true,
            #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
            SimdEngineType::Engine128 => true,
            #[cfg(target_arch = "x86_64")]
            SimdEngineType::Engine256 => is_x86_feature_detected!("avx2"),
            #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
            SimdEngineType::Engine512 => {
                is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("avx512bw")
            }
            SimdEngineType::Portable { lanes } => {
                super::portable::PortableEngine::new(lanes).is_some()
            }
        }
    }
}

impl fmt::Display for SimdEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&simd_engine_description(*self))
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1").unwrap_or(false)
}

/// Detects the optimal lane engine based on CPU features
///
/// Environment variable overrides for testing/debugging:
/// - `Q15_AXPY_FORCE_SCALAR=1`: Force the scalar reference path
/// - `Q15_AXPY_FORCE_SSE=1`: Force SSE/128-bit engine (skip AVX2/AVX-512)
/// - `Q15_AXPY_FORCE_AVX2=1`: Force AVX2/256-bit engine (skip AVX-512)
pub fn detect_optimal_simd_engine() -> SimdEngineType {
    if env_flag("Q15_AXPY_FORCE_SCALAR") {
        log::info!("Q15_AXPY_FORCE_SCALAR=1: Using scalar reference path");
        return SimdEngineType::Scalar;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if env_flag("Q15_AXPY_FORCE_SSE") {
            log::info!("Q15_AXPY_FORCE_SSE=1: Using SSE (128-bit) engine");
            return SimdEngineType::Engine128;
        }

        #[cfg(feature = "avx512")]
        {
            let force_avx2 = env_flag("Q15_AXPY_FORCE_AVX2");
            if !force_avx2 && SimdEngineType::Engine512.is_available() {
                return SimdEngineType::Engine512;
            }
            if force_avx2 {
                log::info!("Q15_AXPY_FORCE_AVX2=1: Using AVX2 (256-bit) engine");
            }
        }

        if SimdEngineType::Engine256.is_available() {
            return SimdEngineType::Engine256;
        }

        // Fallback to SSE2 (always available on x86_64)
        SimdEngineType::Engine128
    }

    #[cfg(target_arch = "aarch64")]
    {
        // aarch64 always has 128-bit NEON
        SimdEngineType::Engine128
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        SimdEngineType::Scalar
    }
}

/// Engine detected once per process.
pub fn detected_simd_engine() -> SimdEngineType {
    static DETECTED: OnceLock<SimdEngineType> = OnceLock::new();
    *DETECTED.get_or_init(|| {
        let engine = detect_optimal_simd_engine();
        log::debug!("Detected lane engine: {}", simd_engine_description(engine));
        engine
    })
}

/// Returns a human-readable description of the lane engine
pub fn simd_engine_description(engine: SimdEngineType) -> String {
    match engine {
        SimdEngineType::Scalar => "Scalar (reference path, 1 element per step)".to_string(),
        #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
        SimdEngineType::Engine128 => {
            #[cfg(target_arch = "x86_64")]
            {
                "SSE2 (128-bit, 8-way i16 parallelism)".to_string()
            }
            #[cfg(not(target_arch = "x86_64"))]
            {
                "NEON (128-bit, 8-way i16 parallelism)".to_string()
            }
        }
        #[cfg(target_arch = "x86_64")]
        SimdEngineType::Engine256 => "AVX2 (256-bit, 16-way i16 parallelism)".to_string(),
        #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
        SimdEngineType::Engine512 => "AVX-512 (512-bit, 32-way i16 parallelism)".to_string(),
        SimdEngineType::Portable { lanes } => format!(
            "Portable (VLEN={} bits, {}-way i16 parallelism)",
            lanes * 16,
            lanes
        ),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test runtime engine detection
    #[test]
    fn test_simd_engine_detection() {
        let engine = detect_optimal_simd_engine();
        let description = simd_engine_description(engine);

        println!("Detected lane engine: {:?}", engine);
        println!("Description: {}", description);

        assert!(engine.is_available());

        if std::env::var("Q15_AXPY_FORCE_SCALAR").is_ok() {
            return;
        }

        #[cfg(target_arch = "x86_64")]
        {
            if std::env::var("Q15_AXPY_FORCE_SSE").is_err() {
                if is_x86_feature_detected!("avx512bw") {
                    #[cfg(feature = "avx512")]
                    assert_eq!(engine, SimdEngineType::Engine512);
                } else if is_x86_feature_detected!("avx2") {
                    assert_eq!(engine, SimdEngineType::Engine256);
                } else {
                    assert_eq!(engine, SimdEngineType::Engine128);
                }
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            assert_eq!(engine, SimdEngineType::Engine128);
        }
    }

    #[test]
    fn test_detected_engine_is_stable() {
        assert_eq!(detected_simd_engine(), detected_simd_engine());
    }

    #[test]
    fn test_engine_lanes() {
        assert_eq!(SimdEngineType::Scalar.lanes(), 1);
        assert_eq!(SimdEngineType::Portable { lanes: 24 }.lanes(), 24);
        #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
        assert_eq!(SimdEngineType::Engine128.lanes(), 8);
        #[cfg(target_arch = "x86_64")]
        assert_eq!(SimdEngineType::Engine256.lanes(), 16);
    }

    #[test]
    fn test_portable_availability_follows_lane_bounds() {
        assert!(SimdEngineType::Portable { lanes: 1 }.is_available());
        assert!(SimdEngineType::Portable { lanes: 64 }.is_available());
        assert!(!SimdEngineType::Portable { lanes: 0 }.is_available());
        assert!(!SimdEngineType::Portable { lanes: 65 }.is_available());
    }

    #[test]
    fn test_engine_description() {
        assert!(simd_engine_description(SimdEngineType::Scalar).starts_with("Scalar"));
        assert_eq!(
            SimdEngineType::Portable { lanes: 16 }.to_string(),
            "Portable (VLEN=256 bits, 16-way i16 parallelism)"
        );
    }
}

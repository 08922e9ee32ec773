// tests/kernel_parity.rs
// Every lane engine, at every step width, must reproduce the scalar oracle bit for bit.

use q15_axpy::bench::Dataset;
use q15_axpy::kernels::{
    CappedVl, StepSchedule, VlPolicy, Vlmax, q15_axpy, q15_axpy_par_chunked, q15_axpy_ref,
    q15_axpy_with,
};
use q15_axpy::simd_abstraction::portable::PORTABLE_MAX_LANES;
use q15_axpy::{SimdEngineType, verify_equal};

/// Every engine this build knows about that the running CPU can execute.
fn available_engines() -> Vec<SimdEngineType> {
    let mut engines = vec![SimdEngineType::Scalar];
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    engines.push(SimdEngineType::Engine128);
    #[cfg(target_arch = "x86_64")]
    engines.push(SimdEngineType::Engine256);
    #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
    engines.push(SimdEngineType::Engine512);
    for lanes in [1, 3, 8, 16, 24, 64] {
        engines.push(SimdEngineType::Portable { lanes });
    }
    engines.retain(|e| {
        let ok = e.is_available();
        if !ok {
            eprintln!("Skipping {e:?} - not supported on this CPU");
        }
        ok
    });
    engines
}

fn reference(a: &[i16], b: &[i16], alpha: i16) -> Vec<i16> {
    let mut y = vec![0i16; a.len()];
    q15_axpy_ref(a, b, &mut y, alpha);
    y
}

fn run<P: VlPolicy + ?Sized>(
    engine: SimdEngineType,
    a: &[i16],
    b: &[i16],
    alpha: i16,
    policy: &mut P,
) -> Vec<i16> {
    let mut y = vec![0i16; a.len()];
    q15_axpy_with(engine, a, b, &mut y, alpha, policy);
    y
}

#[test]
fn test_random_dataset_all_engines() {
    let data = Dataset::generate(4096, 1234);
    for alpha in [3, -3, 0, 1, -1, 32767, -32768, 12345] {
        let y_ref = reference(&data.a, &data.b, alpha);
        for engine in available_engines() {
            let y = run(engine, &data.a, &data.b, alpha, &mut Vlmax);
            let v = verify_equal(&y_ref, &y);
            assert!(v.equal, "{engine:?} alpha={alpha}: {v}");
        }
    }
}

#[test]
fn test_boundary_values_all_engines() {
    let edges = [i16::MIN, i16::MIN + 1, -16384, -1, 0, 1, 16384, i16::MAX - 1, i16::MAX];
    let mut a = Vec::new();
    let mut b = Vec::new();
    for &x in &edges {
        for &z in &edges {
            a.push(x);
            b.push(z);
        }
    }
    for &alpha in &edges {
        let y_ref = reference(&a, &b, alpha);
        for engine in available_engines() {
            assert_eq!(run(engine, &a, &b, alpha, &mut Vlmax), y_ref, "{engine:?} alpha={alpha}");
        }
    }
}

#[test]
fn test_positive_overflow_saturates() {
    for engine in available_engines() {
        let y = run(engine, &[32767; 40], &[32767; 40], 32767, &mut Vlmax);
        assert!(y.iter().all(|&v| v == 32767), "{engine:?}");
    }
}

#[test]
fn test_negative_overflow_saturates() {
    for engine in available_engines() {
        let y = run(engine, &[-32768; 40], &[-32768; 40], 32767, &mut Vlmax);
        assert!(y.iter().all(|&v| v == -32768), "{engine:?}");
    }
}

#[test]
fn test_pass_through() {
    for engine in available_engines() {
        let y = run(engine, &[100; 19], &[10; 19], 3, &mut Vlmax);
        assert!(y.iter().all(|&v| v == 130), "{engine:?}");
    }
}

#[test]
fn test_zero_length_leaves_output_alone() {
    for engine in available_engines() {
        let mut y: Vec<i16> = Vec::new();
        q15_axpy_with(engine, &[], &[], &mut y, 3, &mut Vlmax);
        assert!(y.is_empty());
    }
}

#[test]
fn test_tail_4099() {
    let data = Dataset::generate(4099, 99);
    let y_ref = reference(&data.a, &data.b, 3);
    for engine in available_engines() {
        let y = run(engine, &data.a, &data.b, 3, &mut Vlmax);
        assert_eq!(y, y_ref, "{engine:?}");
    }
}

#[test]
fn test_lengths_around_register_widths() {
    for n in [1, 2, 7, 8, 9, 15, 16, 17, 31, 32, 33, 63, 64, 65, 127, 129] {
        let data = Dataset::generate(n, n as u64);
        let y_ref = reference(&data.a, &data.b, -7);
        for engine in available_engines() {
            assert_eq!(run(engine, &data.a, &data.b, -7, &mut Vlmax), y_ref, "{engine:?} n={n}");
        }
    }
}

#[test]
fn test_width_independence_capped() {
    let data = Dataset::generate(1000, 5);
    let y_ref = reference(&data.a, &data.b, 3);
    for engine in available_engines() {
        for cap in 1..=engine.lanes() {
            let mut policy = CappedVl::new(cap).unwrap();
            let y = run(engine, &data.a, &data.b, 3, &mut policy);
            assert_eq!(y, y_ref, "{engine:?} cap={cap}");
        }
    }
}

#[test]
fn test_width_independence_varying_steps() {
    let data = Dataset::generate(2049, 11);
    let y_ref = reference(&data.a, &data.b, 3);
    let schedules = [vec![1, 2, 3, 5, 8, 13, 21, 34], vec![64, 1], vec![7], vec![3, 16, 9, 1, 32]];
    for engine in available_engines() {
        for widths in &schedules {
            let mut policy = StepSchedule::new(widths.clone());
            let y = run(engine, &data.a, &data.b, 3, &mut policy);
            assert_eq!(y, y_ref, "{engine:?} schedule={widths:?}");
        }
    }
}

#[test]
fn test_portable_every_lane_count() {
    let data = Dataset::generate(1031, 1234);
    let y_ref = reference(&data.a, &data.b, 3);
    for lanes in 1..=PORTABLE_MAX_LANES {
        let y = run(SimdEngineType::Portable { lanes }, &data.a, &data.b, 3, &mut Vlmax);
        assert_eq!(y, y_ref, "lanes={lanes}");
    }
}

#[test]
fn test_detected_engine_matches_reference() {
    let data = Dataset::generate(4096, 1234);
    let mut y = vec![0i16; 4096];
    q15_axpy(&data.a, &data.b, &mut y, 3);
    assert_eq!(y, reference(&data.a, &data.b, 3));
}

#[test]
fn test_parallel_partitions_match_reference() {
    let data = Dataset::generate(50_000, 77);
    let y_ref = reference(&data.a, &data.b, 3);
    for engine in available_engines() {
        for chunk in [1000, 4096, 12_345] {
            let mut y = vec![0i16; data.len()];
            q15_axpy_par_chunked(engine, &data.a, &data.b, &mut y, 3, chunk);
            assert_eq!(y, y_ref, "{engine:?} chunk={chunk}");
        }
    }
}

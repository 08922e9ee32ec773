use clap::Parser;
use std::num::NonZeroUsize;

use q15_axpy::bench::{self, BenchConfig, ClockKind, EngineChoice};
use q15_axpy::defaults;

#[derive(Parser)]
#[command(name = "q15-axpy")]
#[command(about = "Q15 saturating AXPY: scalar reference vs vector-length-agnostic lane kernel", long_about = None)]
#[command(version)]
struct Cli {
    /// Number of samples per array
    #[arg(short = 'n', long, value_name = "INT", default_value_t = defaults::LEN)]
    len: usize,

    /// Seed for the dataset generator
    #[arg(short = 's', long, value_name = "INT", default_value_t = defaults::SEED)]
    seed: u64,

    /// Q15 scalar multiplier
    #[arg(short = 'a', long, value_name = "INT", default_value_t = defaults::ALPHA, allow_negative_numbers = true)]
    alpha: i16,

    /// Lane engine: auto, scalar, engine128, engine256, engine512, portable
    #[arg(short = 'e', long, value_name = "STR", default_value = "auto")]
    engine: String,

    /// Simulated vector register length in bits for the portable engine
    #[arg(long, value_name = "BITS", default_value_t = defaults::VLEN_BITS)]
    vlen: usize,

    /// Process at most INT elements per step
    #[arg(long, value_name = "INT")]
    max_vl: Option<usize>,

    /// Number of threads for the lane kernel (0 = all cores)
    #[arg(short = 't', long, value_name = "INT", default_value_t = defaults::THREADS)]
    threads: usize,

    /// Time source: auto, cycles, nanos
    #[arg(long, value_name = "STR", default_value = "auto")]
    clock: String,

    /// Verbosity level: 1=error, 2=warning, 3=message, 4+=debugging
    #[arg(short = 'v', long, value_name = "INT", default_value_t = defaults::VERBOSITY)]
    verbosity: i32,
}

fn build_config(cli: &Cli) -> anyhow::Result<(BenchConfig, ClockKind)> {
    let engine = cli.engine.parse::<EngineChoice>()?.resolve(cli.vlen)?;
    let clock = cli.clock.parse::<ClockKind>()?;

    let max_vl = match cli.max_vl {
        None => None,
        Some(w) => match NonZeroUsize::new(w) {
            Some(w) => Some(w),
            None => anyhow::bail!("--max-vl must be at least 1"),
        },
    };

    let mut num_threads = if cli.threads == 0 {
        num_cpus::get()
    } else {
        cli.threads
    };

    // Reasonable upper bound to prevent accidental resource exhaustion
    let max_threads = num_cpus::get() * 2;
    if num_threads > max_threads {
        log::warn!(
            "Thread count {} exceeds recommended maximum {}, capping at {}",
            num_threads,
            max_threads,
            max_threads
        );
        num_threads = max_threads;
    }

    let config = BenchConfig {
        len: cli.len,
        seed: cli.seed,
        alpha: cli.alpha,
        engine,
        max_vl,
        threads: num_threads,
    };
    config.validate()?;
    Ok((config, clock))
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace, // 5+ = trace
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None) // Don't show timestamps
        .format_target(false) // Don't show module names
        .init();

    let (config, clock_kind) = match build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    if config.threads > 1 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
        {
            Ok(_) => {
                log::debug!(
                    "Successfully built global Rayon thread pool with {} threads",
                    config.threads
                );
            }
            Err(e) => {
                log::warn!(
                    "Failed to configure thread pool: {} (may already be initialized)",
                    e
                );
            }
        }
    }

    let clock = match clock_kind.build() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let thread_word = if config.threads == 1 { "thread" } else { "threads" };
    log::info!("Engine: {}", config.engine);
    log::info!(
        "Samples: {}, seed: {}, alpha: {}, {} {}",
        config.len,
        config.seed,
        config.alpha,
        config.threads,
        thread_word
    );
    if let Some(cap) = config.max_vl {
        log::info!("Vector length capped at {} elements per step", cap);
    }
    log::info!("Timing in {}", clock.unit());

    let report = match bench::run_benchmark(&config, clock.as_ref()) {
        Ok(r) => r,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    println!("{}", report);
    log::info!("CPU time: {:.3} sec", bench::cputime());

    if !report.verification.equal {
        std::process::exit(1);
    }
}

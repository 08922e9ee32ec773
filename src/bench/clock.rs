//! Time sources for the benchmark harness
//!
//! The harness only needs "read a monotonically non-decreasing counter" and a
//! label for its unit. `CycleCounter` reads the CPU's free-running counter
//! (`rdtsc` on x86_64, `cntvct_el0` on aarch64); `MonotonicClock` counts
//! nanoseconds from `std::time::Instant` and works everywhere.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Unit a [`TimeSource`] counts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Cycles,
    Nanos,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Cycles => f.write_str("cycles"),
            TimeUnit::Nanos => f.write_str("ns"),
        }
    }
}

/// Monotonic counter used to cost a kernel run.
pub trait TimeSource {
    /// Current counter value. Successive reads never decrease.
    fn now(&self) -> u64;

    fn unit(&self) -> TimeUnit;
}

/// Nanoseconds elapsed since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn unit(&self) -> TimeUnit {
        TimeUnit::Nanos
    }
}

/// Hardware cycle / tick counter.
#[derive(Debug, Clone, Copy)]
pub struct CycleCounter {
    _private: (),
}

impl CycleCounter {
    /// `None` on targets without a readable counter.
    pub fn new() -> Option<Self> {
        if cfg!(any(target_arch = "x86_64", target_arch = "aarch64")) {
            Some(Self { _private: () })
        } else {
            None
        }
    }
}

impl TimeSource for CycleCounter {
    #[inline]
    fn now(&self) -> u64 {
        read_cycle_counter()
    }

    fn unit(&self) -> TimeUnit {
        TimeUnit::Cycles
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn read_cycle_counter() -> u64 {
    // SAFETY: rdtsc is available on every x86_64 CPU
    unsafe { std::arch::x86_64::_rdtsc() }
}

#[cfg(target_arch = "aarch64")]
#[inline]
fn read_cycle_counter() -> u64 {
    let ticks: u64;
    // SAFETY: cntvct_el0 is readable from EL0 on Linux and macOS
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) ticks, options(nomem, nostack));
    }
    ticks
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline]
fn read_cycle_counter() -> u64 {
    0
}

/// Which time source the harness should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClockKind {
    /// Cycle counter where available, nanoseconds otherwise.
    #[default]
    Auto,
    Cycles,
    Nanos,
}

impl FromStr for ClockKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ClockKind::Auto),
            "cycles" => Ok(ClockKind::Cycles),
            "nanos" | "ns" => Ok(ClockKind::Nanos),
            other => anyhow::bail!("unknown clock '{}' (expected auto, cycles or nanos)", other),
        }
    }
}

impl ClockKind {
    /// Build the time source.
    ///
    /// `Cycles` fails on targets without a counter; `Auto` falls back to
    /// nanoseconds there.
    pub fn build(self) -> anyhow::Result<Box<dyn TimeSource>> {
        match self {
            ClockKind::Nanos => Ok(Box::new(MonotonicClock::new())),
            ClockKind::Cycles => match CycleCounter::new() {
                Some(c) => Ok(Box::new(c)),
                None => anyhow::bail!("no cycle counter on this target"),
            },
            ClockKind::Auto => match CycleCounter::new() {
                Some(c) => Ok(Box::new(c)),
                None => {
                    log::debug!("No cycle counter, timing in nanoseconds");
                    Ok(Box::new(MonotonicClock::new()))
                }
            },
        }
    }
}

/// CPU time (user + system) consumed by this process, in seconds.
pub fn cputime() -> f64 {
    let rusage = unsafe {
        let mut rusage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
        libc::getrusage(libc::RUSAGE_SELF, rusage.as_mut_ptr());
        rusage.assume_init()
    };
    let user_time = rusage.ru_utime;
    let sys_time = rusage.ru_stime;
    (user_time.tv_sec as f64 + user_time.tv_usec as f64 * 1e-6)
        + (sys_time.tv_sec as f64 + sys_time.tv_usec as f64 * 1e-6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_never_decreases() {
        let clock = MonotonicClock::new();
        let mut last = clock.now();
        for _ in 0..1000 {
            let t = clock.now();
            assert!(t >= last);
            last = t;
        }
        assert_eq!(clock.unit(), TimeUnit::Nanos);
    }

    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    #[test]
    fn test_cycle_counter_advances() {
        let c = CycleCounter::new().unwrap();
        let t0 = c.now();
        let mut acc = 0u64;
        for i in 0..100_000u64 {
            acc = acc.wrapping_add(std::hint::black_box(i));
        }
        std::hint::black_box(acc);
        assert!(c.now() >= t0);
        assert_eq!(c.unit(), TimeUnit::Cycles);
    }

    #[test]
    fn test_clock_kind_parse() {
        assert_eq!("auto".parse::<ClockKind>().unwrap(), ClockKind::Auto);
        assert_eq!("Cycles".parse::<ClockKind>().unwrap(), ClockKind::Cycles);
        assert_eq!("ns".parse::<ClockKind>().unwrap(), ClockKind::Nanos);
        assert!("sundial".parse::<ClockKind>().is_err());
    }

    #[test]
    fn test_nanos_clock_builds_everywhere() {
        let clock = ClockKind::Nanos.build().unwrap();
        assert_eq!(clock.unit(), TimeUnit::Nanos);
        assert!(ClockKind::Auto.build().is_ok());
    }

    #[test]
    fn test_cputime_is_non_negative() {
        assert!(cputime() >= 0.0);
    }
}

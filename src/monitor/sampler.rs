//! CPU utilization sampling.
//!
//! [`SystemSampler`] wraps the sysinfo crate. Per-CPU counters are
//! snapshotted, the sampler sleeps for the requested interval, counters are
//! snapshotted again, and the delta becomes one [`Reading`]. Each call
//! consumes wall-clock time equal to the interval; that blocking window is
//! what the utilization figure is averaged over.

use std::time::Duration;

use sysinfo::{CpuRefreshKind, RefreshKind, System};

use crate::core::errors::{CuaError, Result};

/// One instantaneous utilization sample, in percent of total CPU capacity.
///
/// Values lie in `[0.0, 100.0]`. Readings are ephemeral: produced by a
/// sampler, evaluated once, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Measured utilization percentage.
    pub percent: f64,
}

impl Reading {
    /// Build a reading, clamping to the valid percentage range.
    #[must_use]
    pub fn new(percent: f64) -> Self {
        Self {
            percent: percent.clamp(0.0, 100.0),
        }
    }
}

/// The external CPU sensor boundary.
///
/// `sample` blocks for approximately `interval` while utilization data
/// accumulates, then returns the measured percentage. Implementations must
/// not retry internally; an unavailable sensor surfaces as
/// [`CuaError::SensorUnavailable`] and the session decides what to do.
pub trait Sampler {
    /// Take one blocking utilization sample over `interval`.
    fn sample(&mut self, interval: Duration) -> Result<Reading>;
}

/// sysinfo-backed sampler reading host-wide CPU utilization.
pub struct SystemSampler {
    system: System,
}

impl SystemSampler {
    /// Initialise the sensor and take a priming snapshot.
    ///
    /// The first utilization figure from sysinfo is meaningless until two
    /// refreshes have happened; priming here keeps the first `sample` call
    /// as accurate as later ones.
    #[must_use]
    pub fn new() -> Self {
        let mut system = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
        );
        system.refresh_cpu_usage();
        Self { system }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for SystemSampler {
    fn sample(&mut self, interval: Duration) -> Result<Reading> {
        std::thread::sleep(interval);
        self.system.refresh_cpu_usage();

        if self.system.cpus().is_empty() {
            return Err(CuaError::SensorUnavailable {
                details: "host reports no CPUs".to_string(),
            });
        }

        Ok(Reading::new(f64::from(self.system.global_cpu_usage())))
    }
}

//! TOML-backed configuration with validated monitor settings.
//!
//! Every field has a compiled-in default so the tool runs with no config
//! file at all; a file, when present, only overrides what it names. CLI
//! flags are applied on top of the loaded values by the caller.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{CuaError, Result};

/// Default alert threshold in percent.
pub const DEFAULT_THRESHOLD_PCT: f64 = 10.0;

/// Default sampling interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Monitor-loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Alert when a reading strictly exceeds this percentage. Must lie in
    /// `(0, 100]`.
    pub threshold_pct: f64,
    /// Wall-clock time each sample accumulates over. Must be positive.
    pub interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold_pct: DEFAULT_THRESHOLD_PCT,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl MonitorConfig {
    /// Sampling interval as a [`Duration`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Check the range constraints on threshold and interval.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_pct.is_finite()
            || self.threshold_pct <= 0.0
            || self.threshold_pct > 100.0
        {
            return Err(CuaError::InvalidConfig {
                details: format!(
                    "threshold_pct must be in (0, 100], got {}",
                    self.threshold_pct
                ),
            });
        }
        if self.interval_ms == 0 {
            return Err(CuaError::InvalidConfig {
                details: "interval_ms must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `[monitor]` table.
    pub monitor: MonitorConfig,
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| CuaError::io(path, source))?;
        let config: Self = toml::from_str(&raw)?;
        config.monitor.validate()?;
        Ok(config)
    }
}

//! Threshold policy and the pure alert decision function.

use chrono::Utc;

use crate::core::errors::{CuaError, Result};
use crate::monitor::sampler::Reading;
use crate::monitor::sink::AlertEvent;

/// The configured breach boundary for a monitoring session.
///
/// Immutable once constructed; a session holds exactly one policy for its
/// whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    threshold_pct: f64,
}

impl ThresholdPolicy {
    /// Build a policy. The threshold must lie in `(0, 100]`.
    pub fn new(threshold_pct: f64) -> Result<Self> {
        if !threshold_pct.is_finite() || threshold_pct <= 0.0 || threshold_pct > 100.0 {
            return Err(CuaError::InvalidConfig {
                details: format!("threshold must be in (0, 100], got {threshold_pct}"),
            });
        }
        Ok(Self { threshold_pct })
    }

    /// The configured threshold percentage.
    #[must_use]
    pub const fn threshold_pct(&self) -> f64 {
        self.threshold_pct
    }
}

/// Outcome of evaluating one reading against the policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Reading at or below the threshold; nothing to report.
    NoAlert,
    /// Reading breached the threshold.
    Alert(AlertEvent),
}

/// Map a reading and a policy to a decision. Pure; no hidden state.
///
/// A breach is a *strict* exceedance: a reading exactly equal to the
/// threshold does not alert. Callers depending on boundary behavior get
/// exactly this comparison.
#[must_use]
pub fn evaluate(reading: Reading, policy: &ThresholdPolicy) -> Decision {
    if reading.percent > policy.threshold_pct {
        Decision::Alert(AlertEvent {
            usage_pct: reading.percent,
            threshold_pct: policy.threshold_pct,
            at: Utc::now(),
        })
    } else {
        Decision::NoAlert
    }
}

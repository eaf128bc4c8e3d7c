//! Alert sinks: where breach events go.
//!
//! The monitor loop never knows how alerts are delivered; it hands each
//! [`AlertEvent`] to an [`AlertSink`] and moves on. Sink failures are the
//! sink's problem to describe and the loop's problem to log — they never
//! stop monitoring.

use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use serde::Serialize;

use crate::core::errors::{CuaError, Result};

/// A detected threshold breach.
///
/// Carries the triggering reading and the threshold it violated. Consumed
/// once by the sink; the loop does not retain it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    /// The measured utilization percentage that breached.
    pub usage_pct: f64,
    /// The threshold in force when the breach was detected.
    pub threshold_pct: f64,
    /// When the breach was detected.
    pub at: DateTime<Utc>,
}

impl AlertEvent {
    /// Human-readable alert line carrying the measured percentage.
    #[must_use]
    pub fn console_line(&self) -> String {
        format!(
            "Alert! CPU usage exceeds threshold: {:.1}%",
            self.usage_pct
        )
    }
}

/// Consumer of alert events.
///
/// Implementations must return quickly or hand the event off to another
/// execution context; the monitor loop is blocked for the duration of
/// `notify`.
pub trait AlertSink {
    /// Short sink name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Deliver one event.
    fn notify(&self, event: &AlertEvent) -> Result<()>;
}

impl<T: AlertSink + ?Sized> AlertSink for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn notify(&self, event: &AlertEvent) -> Result<()> {
        (**self).notify(event)
    }
}

/// Prints one human-readable line per breach to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl AlertSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn notify(&self, event: &AlertEvent) -> Result<()> {
        println!("{}", event.console_line());
        Ok(())
    }
}

/// Prints one JSON object per breach to stdout, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSink;

impl AlertSink for JsonSink {
    fn name(&self) -> &'static str {
        "json"
    }

    fn notify(&self, event: &AlertEvent) -> Result<()> {
        println!("{}", serde_json::to_string(event)?);
        Ok(())
    }
}

/// Hands events to a crossbeam channel so another thread can deliver them.
///
/// `notify` is a non-blocking send; a disconnected receiver surfaces as a
/// sink failure rather than wedging the loop.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<AlertEvent>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    #[must_use]
    pub const fn new(tx: Sender<AlertEvent>) -> Self {
        Self { tx }
    }
}

impl AlertSink for ChannelSink {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn notify(&self, event: &AlertEvent) -> Result<()> {
        self.tx
            .try_send(event.clone())
            .map_err(|err| CuaError::SinkNotification {
                sink: "channel",
                details: err.to_string(),
            })
    }
}

/// Retains every event in memory. Used by tests and embedders that want to
/// inspect what the loop emitted.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AlertEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().clone()
    }

    /// Number of events recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl AlertSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn notify(&self, event: &AlertEvent) -> Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

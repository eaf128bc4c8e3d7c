//! CPU Usage Alert: a foreground monitor that samples host CPU utilization
//! on a fixed cadence and raises an alert whenever a reading strictly
//! exceeds the configured threshold.
//!
//! The crate is organised around one monitoring session at a time:
//! a [`monitor::Sampler`] produces readings, [`monitor::evaluate`] maps each
//! reading to a decision, and breaches flow to a pluggable
//! [`monitor::AlertSink`]. The [`monitor::MonitorSession`] state machine
//! owns the loop and its `Idle -> Running -> Stopped` lifecycle.
//!
//! Two sibling utilities ride along: a flat-directory [`backup`] and a
//! [`password`] strength checker.

pub mod backup;
pub mod core;
#[cfg(feature = "daemon")]
pub mod daemon;
pub mod monitor;
pub mod password;

#[cfg(feature = "cli")]
pub mod cli_app;

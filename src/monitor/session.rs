//! The monitoring session: an explicit `Idle -> Running -> Stopped` state
//! machine around the sample/evaluate/notify cycle.
//!
//! Cycles are strictly sequential. Each one blocks in the sampler for the
//! configured interval, evaluates the reading, dispatches an alert if the
//! policy says so, and only then considers starting the next cycle. Nothing
//! is queued or buffered between cycles.
//!
//! Cancellation is cooperative: the flag is observed before each sample, so
//! a cancel issued mid-sample takes effect within one cycle's latency and
//! never interrupts a sample in progress.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::core::errors::{CuaError, Result};
use crate::monitor::policy::{Decision, ThresholdPolicy, evaluate};
use crate::monitor::sampler::Sampler;
use crate::monitor::sink::AlertSink;

/// Lifecycle phase of a [`MonitorSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Constructed but never run.
    #[default]
    Idle,
    /// The sampling loop is executing.
    Running,
    /// Terminal. A stopped session cannot be re-run.
    Stopped,
}

/// Why a running session stopped.
#[derive(Debug)]
pub enum StopReason {
    /// The cancellation flag was raised.
    Cancelled,
    /// The sampler reported an unrecoverable failure. The session aborts
    /// rather than retrying.
    SensorFailure(CuaError),
}

/// Shared cancellation flag, observable from any thread.
///
/// Clones share the same underlying flag. Raising it is sticky: once
/// cancelled, always cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    raised: Arc<AtomicBool>,
}

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the session stop before its next cycle.
    pub fn cancel(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// The underlying atomic, for wiring into signal handlers.
    pub(crate) fn shared(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.raised)
    }
}

/// Orchestrates one monitoring session over a sampler and a sink.
pub struct MonitorSession<S, K> {
    sampler: S,
    sink: K,
    state: SessionState,
    cycles_completed: u64,
}

impl<S: Sampler, K: AlertSink> MonitorSession<S, K> {
    /// Build an idle session.
    pub fn new(sampler: S, sink: K) -> Self {
        Self {
            sampler,
            sink,
            state: SessionState::Idle,
            cycles_completed: 0,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Number of full sample/evaluate/dispatch cycles completed.
    #[must_use]
    pub const fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// Run the sampling loop until cancelled or the sensor fails.
    ///
    /// Validates `interval` up front; an invalid interval leaves the session
    /// `Idle`. Once running, the loop only exits through the cancellation
    /// flag or a sampler error, and either way the session ends `Stopped`.
    /// Sink failures are logged and swallowed; they never stop the loop.
    ///
    /// # Errors
    /// `InvalidConfig` for a zero interval, `SessionExhausted` when called
    /// on a stopped session. Runtime outcomes are reported through
    /// [`StopReason`], not as errors.
    pub fn run(
        &mut self,
        policy: &ThresholdPolicy,
        interval: Duration,
        cancel: &CancelFlag,
    ) -> Result<StopReason> {
        if self.state == SessionState::Stopped {
            return Err(CuaError::SessionExhausted);
        }
        if interval.is_zero() {
            return Err(CuaError::InvalidConfig {
                details: "sampling interval must be positive".to_string(),
            });
        }

        self.state = SessionState::Running;
        tracing::info!(
            threshold_pct = policy.threshold_pct(),
            interval_ms = interval.as_millis() as u64,
            "monitoring started"
        );

        let reason = loop {
            if cancel.is_cancelled() {
                tracing::info!(
                    cycles = self.cycles_completed,
                    "cancellation observed; stopping"
                );
                break StopReason::Cancelled;
            }

            let reading = match self.sampler.sample(interval) {
                Ok(reading) => reading,
                Err(err) => {
                    tracing::error!(code = err.code(), error = %err, "sampling failed; aborting session");
                    break StopReason::SensorFailure(err);
                }
            };

            if let Decision::Alert(event) = evaluate(reading, policy) {
                tracing::warn!(
                    usage_pct = event.usage_pct,
                    threshold_pct = event.threshold_pct,
                    "threshold breached"
                );
                if let Err(err) = self.sink.notify(&event) {
                    // Sink trouble is isolated at the loop boundary.
                    tracing::warn!(sink = self.sink.name(), code = err.code(), error = %err, "alert sink rejected event");
                }
            }

            self.cycles_completed += 1;
        };

        self.state = SessionState::Stopped;
        Ok(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::{CancelFlag, MonitorSession, SessionState, StopReason};
    use crate::core::errors::{CuaError, Result};
    use crate::monitor::policy::ThresholdPolicy;
    use crate::monitor::sampler::{Reading, Sampler};
    use crate::monitor::sink::{AlertEvent, AlertSink, RecordingSink};
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Sampler driven by a queue of canned outcomes. Raises the cancel flag
    /// when the queue runs dry so scenario tests terminate.
    struct ScriptedSampler {
        script: VecDeque<Result<Reading>>,
        calls: usize,
        drain_cancel: CancelFlag,
    }

    impl ScriptedSampler {
        fn new(script: Vec<Result<Reading>>, drain_cancel: CancelFlag) -> Self {
            Self {
                script: script.into(),
                calls: 0,
                drain_cancel,
            }
        }
    }

    impl Sampler for ScriptedSampler {
        fn sample(&mut self, _interval: Duration) -> Result<Reading> {
            self.calls += 1;
            match self.script.pop_front() {
                Some(outcome) => {
                    if self.script.is_empty() {
                        self.drain_cancel.cancel();
                    }
                    outcome
                }
                None => {
                    panic!("sampler called after script drained and cancel raised");
                }
            }
        }
    }

    fn reading(percent: f64) -> Result<Reading> {
        Ok(Reading::new(percent))
    }

    fn sensor_down() -> Result<Reading> {
        Err(CuaError::SensorUnavailable {
            details: "scripted outage".to_string(),
        })
    }

    #[test]
    fn session_starts_idle() {
        let cancel = CancelFlag::new();
        let session = MonitorSession::new(
            ScriptedSampler::new(vec![], cancel),
            RecordingSink::new(),
        );
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn zero_interval_is_rejected_and_session_stays_idle() {
        let cancel = CancelFlag::new();
        let mut session = MonitorSession::new(
            ScriptedSampler::new(vec![reading(50.0)], cancel.clone()),
            RecordingSink::new(),
        );
        let policy = ThresholdPolicy::new(10.0).expect("valid");

        let err = session
            .run(&policy, Duration::ZERO, &cancel)
            .expect_err("zero interval must fail");
        assert_eq!(err.code(), "CUA-1001");
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn scenario_two_breaches_out_of_four_readings() {
        let cancel = CancelFlag::new();
        let sampler = ScriptedSampler::new(
            vec![reading(5.0), reading(12.0), reading(9.0), reading(100.0)],
            cancel.clone(),
        );
        let mut session = MonitorSession::new(sampler, RecordingSink::new());
        let policy = ThresholdPolicy::new(10.0).expect("valid");

        let reason = session
            .run(&policy, Duration::from_millis(1), &cancel)
            .expect("run completes");
        assert!(matches!(reason, StopReason::Cancelled));
        assert_eq!(session.state(), SessionState::Stopped);
        assert_eq!(session.cycles_completed(), 4);

        let events: Vec<AlertEvent> = session.sink.events();
        assert_eq!(events.len(), 2, "exactly readings 12 and 100 breach");
        assert!((events[0].usage_pct - 12.0).abs() < f64::EPSILON);
        assert!((events[1].usage_pct - 100.0).abs() < f64::EPSILON);
        assert!(events.iter().all(|e| (e.threshold_pct - 10.0).abs() < f64::EPSILON));
    }

    #[test]
    fn sensor_failure_on_third_call_aborts_after_two_cycles() {
        let cancel = CancelFlag::new();
        let sampler = ScriptedSampler::new(
            vec![reading(85.0), reading(90.0), sensor_down()],
            cancel.clone(),
        );
        let mut session = MonitorSession::new(sampler, RecordingSink::new());
        let policy = ThresholdPolicy::new(80.0).expect("valid");

        let reason = session
            .run(&policy, Duration::from_millis(1), &cancel)
            .expect("run completes");
        match reason {
            StopReason::SensorFailure(err) => assert_eq!(err.code(), "CUA-2001"),
            StopReason::Cancelled => panic!("expected sensor failure"),
        }
        assert_eq!(session.state(), SessionState::Stopped);
        assert_eq!(session.cycles_completed(), 2);
        assert_eq!(session.sink.len(), 2, "no third sink invocation");
    }

    #[test]
    fn pre_cancelled_flag_stops_before_any_sample() {
        let cancel = CancelFlag::new();
        cancel.cancel();

        let sampler = ScriptedSampler::new(vec![reading(99.0)], cancel.clone());
        let mut session = MonitorSession::new(sampler, RecordingSink::new());
        let policy = ThresholdPolicy::new(10.0).expect("valid");

        let reason = session
            .run(&policy, Duration::from_millis(1), &cancel)
            .expect("run completes");
        assert!(matches!(reason, StopReason::Cancelled));
        assert_eq!(session.state(), SessionState::Stopped);
        assert_eq!(session.sampler.calls, 0, "no sampler call after cancel");
        assert!(session.sink.is_empty());
    }

    #[test]
    fn stopped_session_cannot_be_rerun() {
        let cancel = CancelFlag::new();
        cancel.cancel();

        let sampler = ScriptedSampler::new(vec![], cancel.clone());
        let mut session = MonitorSession::new(sampler, RecordingSink::new());
        let policy = ThresholdPolicy::new(50.0).expect("valid");

        session
            .run(&policy, Duration::from_millis(1), &cancel)
            .expect("first run");
        let err = session
            .run(&policy, Duration::from_millis(1), &cancel)
            .expect_err("second run must fail");
        assert_eq!(err.code(), "CUA-2002");
    }

    #[test]
    fn sink_failure_does_not_stop_the_loop() {
        struct FailingSink;
        impl AlertSink for FailingSink {
            fn name(&self) -> &'static str {
                "failing"
            }
            fn notify(&self, _event: &AlertEvent) -> Result<()> {
                Err(CuaError::SinkNotification {
                    sink: "failing",
                    details: "scripted rejection".to_string(),
                })
            }
        }

        let cancel = CancelFlag::new();
        let sampler = ScriptedSampler::new(
            vec![reading(95.0), reading(96.0), reading(97.0)],
            cancel.clone(),
        );
        let mut session = MonitorSession::new(sampler, FailingSink);
        let policy = ThresholdPolicy::new(10.0).expect("valid");

        let reason = session
            .run(&policy, Duration::from_millis(1), &cancel)
            .expect("run completes despite sink failures");
        assert!(matches!(reason, StopReason::Cancelled));
        assert_eq!(session.cycles_completed(), 3);
    }
}

//! CPU monitoring: sampling, threshold policy evaluation, alert sinks, and
//! the session loop that ties them together.

pub mod policy;
pub mod sampler;
pub mod session;
pub mod sink;

pub use policy::{Decision, ThresholdPolicy, evaluate};
pub use sampler::{Reading, Sampler, SystemSampler};
pub use session::{CancelFlag, MonitorSession, SessionState, StopReason};
pub use sink::{AlertEvent, AlertSink, ChannelSink, ConsoleSink, JsonSink, RecordingSink};

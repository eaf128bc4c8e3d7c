//! Foreground-daemon plumbing: wiring OS signals to session cancellation.

pub mod signals;

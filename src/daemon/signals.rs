//! Interrupt handling for the foreground monitor.
//!
//! SIGINT and SIGTERM raise the session's [`CancelFlag`] instead of killing
//! the process, so the loop observes the flag between cycles and exits
//! through its normal `Stopped` transition.

use crate::core::errors::{CuaError, Result};
use crate::monitor::session::CancelFlag;

/// Register SIGINT and SIGTERM handlers that raise `cancel`.
///
/// Handlers stay registered for the life of the process; the flag is sticky
/// so repeated signals are harmless.
pub fn register_interrupt_handlers(cancel: &CancelFlag) -> Result<()> {
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(signal, cancel.shared()).map_err(|source| {
            CuaError::Runtime {
                details: format!("failed to register handler for signal {signal}: {source}"),
            }
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::register_interrupt_handlers;
    use crate::monitor::session::CancelFlag;

    #[test]
    fn registration_succeeds_and_leaves_flag_unraised() {
        let cancel = CancelFlag::new();
        register_interrupt_handlers(&cancel).expect("signal registration");
        assert!(!cancel.is_cancelled());
    }
}

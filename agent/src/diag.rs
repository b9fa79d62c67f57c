//! Diagnostic channel for session lifecycle and sink failures.
//!
//! Events are emitted via `tracing` with a dedicated target so a host can route
//! them separately from its own logs. Nothing here ever fails or panics: a
//! write error must not take the capture down with it.

use tracing::{info, warn};

pub const DIAG_TARGET: &str = "packetlog::diag";

pub fn session_started(location: &str, exclusions: &str) {
    info!(
        target: DIAG_TARGET,
        event = "session_started",
        location = %location,
        exclusions = %exclusions,
    );
}

pub fn session_stopped(location: &str, count: u64) {
    info!(
        target: DIAG_TARGET,
        event = "session_stopped",
        location = %location,
        count = count,
    );
}

/// A sink operation failed; `op` is one of `open`, `write`, `close`.
pub fn sink_error(op: &str, location: &str, error: &std::io::Error) {
    warn!(
        target: DIAG_TARGET,
        event = "sink_error",
        op = %op,
        location = %location,
        error = %error,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diag_target_is_static() {
        assert_eq!(DIAG_TARGET, "packetlog::diag");
    }
}

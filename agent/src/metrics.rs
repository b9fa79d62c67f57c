//! Prometheus metrics for logging sessions

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, Counter, CounterVec, Encoder, TextEncoder,
};

// ── Message metrics ──────────────────────────────────────────────────────────

/// Messages seen by an enabled session, by verdict (`logged` / `excluded`)
pub static MESSAGES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "packetlog_messages_total",
        "Messages seen by an active session",
        &["verdict"]
    )
    .unwrap()
});

pub static BYTES_LOGGED: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "packetlog_payload_bytes_logged_total",
        "Payload bytes written to session logs"
    )
    .unwrap()
});

// ── Session metrics ──────────────────────────────────────────────────────────

pub static SESSIONS_STARTED: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "packetlog_sessions_started_total",
        "Logging sessions started"
    )
    .unwrap()
});

/// Sink failures by operation (`open` / `write` / `close`)
pub static SINK_ERRORS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "packetlog_sink_errors_total",
        "Log sink I/O failures",
        &["op"]
    )
    .unwrap()
});

/// Render all registered metrics to Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_includes_registered_metrics() {
        SESSIONS_STARTED.inc_by(0.0);
        MESSAGES_TOTAL.with_label_values(&["logged"]).inc_by(0.0);
        let text = encode_metrics();
        assert!(text.contains("packetlog_sessions_started_total"));
        assert!(text.contains("packetlog_messages_total"));
    }
}

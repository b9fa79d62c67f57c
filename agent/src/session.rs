//! Logging session
//!
//! A [`LogSession`] owns at most one open sink at a time. While it is enabled,
//! every message handed to [`LogSession::on_message`] is run through the
//! exclusion filter and, if admitted, appended to the sink as a hex dump.
//!
//! All public operations serialize through one mutex guarding the sink, the
//! counter and the timestamps together, so a host may call in from any thread.

use crate::diag;
use crate::error::Result;
use crate::filter::{should_log, ExclusionStore};
use crate::metrics;
use crate::output::log_format;
use crate::sink::{Sink, SinkOpener};
use chrono::{DateTime, Local};
use packetlog_shared::types::message::{MessageTypeId, ProtocolMessage};
use packetlog_shared::utils::time;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Result of [`LogSession::start`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new sink was opened
    Started { location: String },

    /// The session was already running; nothing changed
    AlreadyActive { location: String },
}

/// Read-only snapshot returned by [`LogSession::status`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub enabled: bool,

    /// Messages logged by the current (or most recent) session
    pub count: u64,

    /// Time since start; zero while idle
    pub elapsed: Duration,

    pub exclusion_summary: String,

    /// Sink location while enabled
    pub location: Option<String>,

    /// Most recent sink failure, cleared by the next successful start
    pub last_error: Option<String>,
}

/// What a finished session produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub location: String,
    pub count: u64,
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
    pub elapsed: Duration,
}

#[derive(Default)]
struct SessionState {
    /// Present iff the session is enabled
    sink: Option<Box<dyn Sink>>,
    count: u64,
    started_at: Option<DateTime<Local>>,
    started: Option<Instant>,
    last_error: Option<String>,
}

pub struct LogSession {
    opener: Box<dyn SinkOpener>,
    exclusions: ExclusionStore,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for LogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSession")
            .field("exclusions", &self.exclusions)
            .field("status", &self.status())
            .finish()
    }
}

impl LogSession {
    /// Create an idle session
    pub fn new(opener: impl SinkOpener + 'static, exclusions: ExclusionStore) -> Self {
        Self {
            opener: Box::new(opener),
            exclusions,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Handle to the exclusion set this session filters against
    pub fn exclusions(&self) -> &ExclusionStore {
        &self.exclusions
    }

    // A sink that panics mid-write poisons the lock, but every field is only
    // assigned in whole steps, so the state stays usable.
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a fresh sink and start logging.
    ///
    /// Returns [`StartOutcome::AlreadyActive`] without touching the running
    /// sink or counter if the session is already enabled.
    pub fn start(&self) -> Result<StartOutcome> {
        let mut state = self.lock();
        if let Some(sink) = &state.sink {
            debug!("Start requested while already logging to {}", sink.location());
            return Ok(StartOutcome::AlreadyActive {
                location: sink.location(),
            });
        }

        let mut sink = match self.opener.open() {
            Ok(sink) => sink,
            Err(e) => {
                metrics::SINK_ERRORS.with_label_values(&["open"]).inc();
                diag::sink_error("open", "-", &e);
                state.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };
        let location = sink.location();

        let started_at = time::now();
        let (header, exclusion_summary) = self.exclusions.with(|set| {
            (log_format::session_header(&started_at, set), set.summary())
        });
        if let Err(e) = sink.write(&header).and_then(|_| sink.flush()) {
            metrics::SINK_ERRORS.with_label_values(&["write"]).inc();
            diag::sink_error("write", &location, &e);
            state.last_error = Some(e.to_string());
            if let Err(close_err) = sink.close() {
                diag::sink_error("close", &location, &close_err);
            }
            return Err(e.into());
        }

        state.sink = Some(sink);
        state.count = 0;
        state.started_at = Some(started_at);
        state.started = Some(Instant::now());
        state.last_error = None;

        metrics::SESSIONS_STARTED.inc();
        diag::session_started(&location, &exclusion_summary);
        info!("Packet logging started: {}", location);

        Ok(StartOutcome::Started { location })
    }

    /// Write the trailer, close the sink and stop logging.
    ///
    /// Does nothing and returns `None` when the session is idle. Sink failures
    /// are reported on the diagnostic channel; the session always ends up idle.
    pub fn stop(&self) -> Option<SessionSummary> {
        let mut state = self.lock();
        let mut sink = state.sink.take()?;
        let location = sink.location();

        let ended_at = time::now();
        let trailer = self
            .exclusions
            .with(|set| log_format::session_trailer(&ended_at, state.count, set));

        if let Err(e) = sink.write(&trailer).and_then(|_| sink.flush()) {
            metrics::SINK_ERRORS.with_label_values(&["write"]).inc();
            diag::sink_error("write", &location, &e);
            state.last_error = Some(e.to_string());
        }
        if let Err(e) = sink.close() {
            metrics::SINK_ERRORS.with_label_values(&["close"]).inc();
            diag::sink_error("close", &location, &e);
            state.last_error = Some(e.to_string());
        }

        let elapsed = state.started.take().map(|s| s.elapsed()).unwrap_or_default();
        let started_at = state.started_at.take().unwrap_or(ended_at);

        diag::session_stopped(&location, state.count);
        info!(
            "Packet logging stopped: {} messages written to {}",
            state.count, location
        );

        Some(SessionSummary {
            location,
            count: state.count,
            started_at,
            ended_at,
            elapsed,
        })
    }

    /// Filter one message and append it to the log if admitted.
    ///
    /// Never fails: a write error is reported on the diagnostic channel and
    /// recorded in the status, and the session keeps running.
    pub fn on_message(&self, type_id: MessageTypeId, payload: &[u8]) {
        let mut guard = self.lock();
        let state = &mut *guard;
        let Some(sink) = state.sink.as_mut() else {
            return;
        };

        if !self
            .exclusions
            .with(|set| should_log(type_id, payload, set))
        {
            metrics::MESSAGES_TOTAL.with_label_values(&["excluded"]).inc();
            return;
        }

        state.count += 1;
        let entry = log_format::message_entry(&time::now(), type_id, payload);
        match sink.write(&entry).and_then(|_| sink.flush()) {
            Ok(()) => {
                metrics::MESSAGES_TOTAL.with_label_values(&["logged"]).inc();
                metrics::BYTES_LOGGED.inc_by(payload.len() as f64);
            }
            Err(e) => {
                metrics::SINK_ERRORS.with_label_values(&["write"]).inc();
                diag::sink_error("write", &sink.location(), &e);
                state.last_error = Some(e.to_string());
            }
        }
    }

    pub fn on_protocol_message(&self, message: &ProtocolMessage) {
        self.on_message(message.type_id, &message.payload);
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().sink.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.lock();
        SessionStatus {
            enabled: state.sink.is_some(),
            count: state.count,
            elapsed: state.started.map(|s| s.elapsed()).unwrap_or_default(),
            exclusion_summary: self.exclusions.with(|set| set.summary()),
            location: state.sink.as_ref().map(|s| s.location()),
            last_error: state.last_error.clone(),
        }
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        self.stop();
    }
}

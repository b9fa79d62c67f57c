//! Packet logging agent library
//!
//! This library provides the core of the packet logger: the exclusion filter,
//! the hex-dump renderer, output sinks and the logging session that ties them
//! together, plus an async feed adapter for hosts that deliver messages over a
//! channel.

pub mod config;
pub mod diag;
pub mod error;
pub mod feed;
pub mod filter;
pub mod metrics;
pub mod output;
pub mod session;
pub mod sink;

pub use config::AgentConfig;
pub use error::SessionError;
pub use filter::{should_log, ExclusionStore};
pub use output::hexdump::render;
pub use session::{LogSession, SessionStatus, SessionSummary, StartOutcome};
pub use sink::{FileSinkOpener, MemorySinkOpener, Sink, SinkOpener};

/// Build an idle session writing to files as described by `config`.
pub fn session_from_config(config: &AgentConfig) -> Result<LogSession, SessionError> {
    let exclusions = config.exclusion_set()?;
    Ok(LogSession::new(
        FileSinkOpener::new(&config.log_dir, &config.file_prefix),
        ExclusionStore::new(exclusions),
    ))
}

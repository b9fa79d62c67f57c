//! Session error types

use packetlog_shared::ConfigError;
use thiserror::Error;

/// Failures a caller of the session can observe
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("log sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

//! Shared types and utilities for packetlog
//!
//! This crate contains the message and filter-rule types, the static filter
//! registry and the capture file format used by the session agent and the CLI.

pub mod error;
pub mod registry;
pub mod types;
pub mod utils;

#[cfg(feature = "wire-protocol")]
pub mod protocol;

// Re-export commonly used types
pub use error::ConfigError;
pub use types::{filter::*, message::*};

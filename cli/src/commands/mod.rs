//! Subcommand implementations

pub mod catalog;
pub mod dump;
pub mod exclusions;
pub mod replay;

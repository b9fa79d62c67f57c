//! Capture file format
//!
//! Recorded message feeds are stored as length-prefixed bincode batches so they
//! can be replayed through a logging session.

pub mod wire;

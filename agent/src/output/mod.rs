//! Log text generation
//!
//! `hexdump` renders payload bytes; `log_format` builds the session header,
//! per-message entries and trailer around it.

pub mod hexdump;
pub mod log_format;

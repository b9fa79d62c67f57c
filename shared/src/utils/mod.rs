//! Utility functions and helpers

pub mod time;

use std::num::ParseIntError;

/// Parse an unsigned number written either as `0x`-prefixed hex or decimal
pub fn parse_number(s: &str) -> Result<u64, ParseIntError> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse::<u64>()
    }
}

/// Format a duration as `HH:MM:SS`, letting the hour field grow past two digits
pub fn format_elapsed(elapsed: std::time::Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

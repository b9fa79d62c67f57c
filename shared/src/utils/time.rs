//! Time-related utilities
//!
//! Session logs use local wall-clock time: a full date in headers and
//! trailers, and a time of day in front of each message.

use chrono::{DateTime, Local};

/// Current local wall-clock time
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// `YYYY-MM-DD HH:MM:SS`, used in session header and trailer lines
pub fn format_date(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `HH:MM:SS`, used in per-message header lines
pub fn format_clock(at: &DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Compact stamp safe for file names, e.g. `20240131_235959`
pub fn format_file_stamp(at: &DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_formats() {
        let at = Local.with_ymd_and_hms(2024, 1, 31, 23, 59, 7).unwrap();
        assert_eq!(format_date(&at), "2024-01-31 23:59:07");
        assert_eq!(format_clock(&at), "23:59:07");
        assert_eq!(format_file_stamp(&at), "20240131_235907");
    }
}

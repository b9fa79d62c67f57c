//! Session log text layout
//!
//! Each block is returned as a single string so the session can append it in
//! one write. Blocks end with a blank line, except the trailer which closes
//! the file.

use super::hexdump;
use chrono::{DateTime, Local};
use packetlog_shared::types::filter::ExclusionSet;
use packetlog_shared::types::message::MessageTypeId;
use packetlog_shared::utils::time::{format_clock, format_date};
use std::fmt::Write;

/// Indent applied to every hex-dump row inside a message entry
const BODY_INDENT: &str = "  ";

pub fn session_header(started: &DateTime<Local>, exclusions: &ExclusionSet) -> String {
    format!(
        "=== Session Started ===\nDate: {}\nExcluded: {}\n\n",
        format_date(started),
        exclusions.summary()
    )
}

/// Header line, indented hex dump, blank line.
pub fn message_entry(at: &DateTime<Local>, type_id: MessageTypeId, payload: &[u8]) -> String {
    let body = hexdump::render(payload);
    let mut out = String::with_capacity(64 + body.len() + body.len() / 24);

    let _ = writeln!(
        out,
        "[{}] Message {} (Size: {} bytes)",
        format_clock(at),
        type_id,
        payload.len()
    );
    for line in body.lines() {
        out.push_str(BODY_INDENT);
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out
}

pub fn session_trailer(ended: &DateTime<Local>, count: u64, exclusions: &ExclusionSet) -> String {
    format!(
        "=== Session Ended ===\nDate: {}\nTotal Messages Logged: {}\nExcluded: {}\n",
        format_date(ended),
        count,
        exclusions.summary()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use packetlog_shared::types::filter::FilterRule;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
    }

    #[test]
    fn test_header_with_no_exclusions() {
        assert_eq!(
            session_header(&at(), &ExclusionSet::new()),
            "=== Session Started ===\nDate: 2024-05-06 07:08:09\nExcluded: NONE\n\n"
        );
    }

    #[test]
    fn test_message_entry_layout() {
        let payload: Vec<u8> = (0u8..18).collect();
        let entry = message_entry(&at(), MessageTypeId(0x0A), &payload);
        assert_eq!(
            entry,
            "[07:08:09] Message 0x00A (Size: 18 bytes)\n\
             \x20 0000: 00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F\n\
             \x20 0010: 10 11\n\
             \n"
        );
    }

    #[test]
    fn test_empty_payload_entry_has_no_body() {
        let entry = message_entry(&at(), MessageTypeId(0x3FF), &[]);
        assert_eq!(entry, "[07:08:09] Message 0x3FF (Size: 0 bytes)\n\n");
    }

    #[test]
    fn test_trailer() {
        let exclusions: ExclusionSet = [FilterRule::composite(0x28, 0x1844)].into_iter().collect();
        assert_eq!(
            session_trailer(&at(), 42, &exclusions),
            "=== Session Ended ===\nDate: 2024-05-06 07:08:09\nTotal Messages Logged: 42\nExcluded: 0x028:0x1844\n"
        );
    }
}

//! Hex dump rendering
//!
//! Turns raw payload bytes into offset-prefixed rows of uppercase hex:
//!
//! ```text
//! 0000: 00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F
//! 0010: 10 11
//! ```

use std::fmt::Write;

/// Bytes per rendered row
pub const BYTES_PER_LINE: usize = 16;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Render a payload as hex-dump text.
///
/// Every row ends with a newline. The last row holds whatever is left and is
/// never padded. An empty payload renders as an empty string.
pub fn render(payload: &[u8]) -> String {
    let rows = payload.len().div_ceil(BYTES_PER_LINE);
    // "OOOO: " + "XX " per byte, minus the trailing space, plus '\n'
    let mut out = String::with_capacity(rows * (6 + BYTES_PER_LINE * 3));

    for (row, chunk) in payload.chunks(BYTES_PER_LINE).enumerate() {
        // Writing to a String cannot fail.
        let _ = write!(out, "{:04X}:", row * BYTES_PER_LINE);
        for &byte in chunk {
            out.push(' ');
            out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
            out.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
        }
        out.push('\n');
    }

    out
}

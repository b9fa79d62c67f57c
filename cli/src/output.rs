//! Output formatting utilities for CLI commands

use colored::Colorize;

/// Print success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print warning message
pub fn warning(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Checkbox marker for catalog listings
pub fn checkbox(checked: bool) -> String {
    if checked {
        format!("[{}]", "x".red())
    } else {
        "[ ]".to_string()
    }
}

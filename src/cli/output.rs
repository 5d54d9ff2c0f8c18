//! CLI output formatting utilities

use colored::Colorize;
use std::io::{self, Write};

/// Write a success message to `out`
pub fn write_success(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "✓".green(), message)
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

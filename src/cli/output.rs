//! Shared CLI output helpers.
//!
//! Status lines go to stderr so stdout carries only command data and can
//! be piped. Color follows `console`'s terminal detection and NO_COLOR.

use std::fmt::Display;

use console::style;

/// Print a success message with checkmark (green).
///
/// Example: `✓ pushed 3 values to sec_1@4`
pub fn success(msg: &str) {
    eprintln!("{} {}", style("✓").green(), msg);
}

/// Print an error message (red).
///
/// Example: `✗ not authenticated`
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red(), msg);
}

/// Print a warning message (yellow).
pub fn warn(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow(), msg);
}

/// Print a hint message (cyan).
///
/// Example: `→ sign in again`
pub fn hint(msg: &str) {
    eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  user:  user_1`
pub fn kv(label: &str, value: impl Display) {
    println!("  {}  {}", style(label).dim(), style(value).bold());
}

/// Print raw data to stdout, unstyled.
pub fn data(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

/// Print a dimmed/secondary message.
///
/// Example: `no secrets in env_dev`
pub fn dimmed(msg: &str) {
    eprintln!("{}", style(msg).dim());
}

/// Format a key name in cyan.
pub fn key(k: &str) -> String {
    style(k).cyan().to_string()
}

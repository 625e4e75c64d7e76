//! Terminal color utilities using ANSI escape codes.
//!
//! Colors are process-global: `set_enabled(false)` turns every helper
//! into a pass-through, which is how `--no-color` reaches the whole
//! binary without threading a flag everywhere.

use std::sync::atomic::{AtomicBool, Ordering};

/// ANSI color codes
pub mod codes {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    // Standard colors
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";

    // Bright variants
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
}

use codes::*;

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Enable or disable color output for the whole process.
pub fn set_enabled(on: bool) {
    ENABLED.store(on, Ordering::SeqCst);
}

/// Whether color output is currently enabled.
pub fn enabled() -> bool {
    ENABLED.load(Ordering::SeqCst)
}

fn paint(style: &str, text: &str) -> String {
    if !enabled() {
        return text.to_string();
    }
    format!("{}{}{}", style, text, RESET)
}

/// Color a label (bold).
pub fn label(text: &str) -> String {
    paint(BOLD, text)
}

/// Color a number/count (bright cyan).
pub fn number(n: impl std::fmt::Display) -> String {
    paint(BRIGHT_CYAN, &n.to_string())
}

/// Color warning messages (yellow).
pub fn warning(text: &str) -> String {
    paint(YELLOW, text)
}

/// Color success messages (green).
pub fn success(text: &str) -> String {
    paint(GREEN, text)
}

/// Color a timestamp (dim).
pub fn timestamp(ts: &str) -> String {
    paint(DIM, ts)
}

/// Emoji constants for consistent usage
pub mod emoji {
    pub const CHECK: &str = "✅";
    pub const SPRINT: &str = "🏃";
}

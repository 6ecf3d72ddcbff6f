//! Terminal output utilities
//!
//! Status lines go to stderr so stdout stays free for `--json` output.

use optidash_core::format::{format_percent, pretty_bytes};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        eprintln!("{} {}", "ℹ".blue(), message);
    }

    /// Print a hint below an error
    pub fn hint(message: &str) {
        eprintln!("  {} {}", "hint:".dimmed(), message.dimmed());
    }
}

/// Render one file's result, e.g. `img/a.jpg  saved 200 B (20.00%)`
pub fn saving_line(label: &str, saved: i64, percent: f64) -> String {
    if saved > 0 {
        format!(
            "{}  {}",
            label,
            format!("saved {} ({}%)", pretty_bytes(saved), format_percent(percent)).green()
        )
    } else {
        format!("{}  {}", label, "already optimized".dimmed())
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

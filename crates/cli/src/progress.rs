//! Progress indicators
//!
//! Bars draw to stderr and stay hidden when it is not a terminal.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const FILE_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta}) {msg}";

/// Create a progress bar for file processing
pub fn file_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_bar().template(FILE_TEMPLATE) {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// A bar that never draws, for quiet or machine-readable runs
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

/// Finish a progress bar with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with an error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.abandon_with_message(format!("✗ {}", message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_progress() {
        let pb = file_progress(10);
        pb.inc(4);
        assert_eq!(pb.position(), 4);
        assert_eq!(pb.length(), Some(10));
        finish_success(&pb, "done");
        assert!(pb.is_finished());
    }

    #[test]
    fn test_hidden() {
        let pb = hidden();
        assert!(pb.is_hidden());
        finish_error(&pb, "failed");
    }
}

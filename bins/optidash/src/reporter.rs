//! Terminal reporter for stage diagnostics

use indicatif::ProgressBar;
use optidash_cli::output::{saving_line, Status};
use optidash_pipeline::{ItemOutcome, Reporter, RunSummary, WorkItem};
use optidash_telemetry::metrics;

/// Prints one line per file above a progress bar and feeds the metrics registry
pub struct ConsoleReporter {
    progress: ProgressBar,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(progress: ProgressBar, quiet: bool) -> Self {
        Self { progress, quiet }
    }

    fn print(&self, line: impl FnOnce()) {
        if !self.quiet {
            self.progress.suspend(line);
        }
    }
}

impl Reporter for ConsoleReporter {
    fn skipped(&self, item: &WorkItem) {
        metrics().increment("files_skipped");
        self.print(|| {
            Status::warning(&format!(
                "Skipping unsupported file {}",
                item.relative().display()
            ))
        });
        self.progress.inc(1);
    }

    fn optimized(&self, item: &WorkItem, outcome: &ItemOutcome) {
        let registry = metrics();
        registry.increment("images_optimized");
        registry.increment_by("input_bytes", outcome.input_bytes);
        registry.increment_by("output_bytes", outcome.output_bytes);

        let label = item.relative().display().to_string();
        self.print(|| eprintln!("{}", saving_line(&label, outcome.saved(), outcome.percent())));
        self.progress.inc(1);
    }

    fn finished(&self, summary: &RunSummary) {
        tracing::info!(
            items = summary.item_count,
            saved_bytes = summary.saved_bytes,
            "{}",
            summary.message()
        );
    }
}

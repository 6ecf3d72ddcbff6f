//! Diagnostic sink for per-item and summary messages
//!
//! Messages are advisory; nothing a reporter does affects the outcome of a run.

use crate::item::WorkItem;
use crate::stats::RunSummary;
use optidash_api_client::OptimizationMeta;
use optidash_core::format::{format_percent, percent_of, pretty_bytes};
use tracing::{info, warn};

/// Size change of one optimized item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemOutcome {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl ItemOutcome {
    #[must_use]
    pub fn saved(&self) -> i64 {
        self.input_bytes as i64 - self.output_bytes as i64
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        percent_of(self.saved(), self.input_bytes)
    }

    /// `saved 200 B (20.00%)`, or `already optimized` when nothing was saved
    #[must_use]
    pub fn message(&self) -> String {
        if self.saved() <= 0 {
            "already optimized".to_string()
        } else {
            format!(
                "saved {} ({}%)",
                pretty_bytes(self.saved()),
                format_percent(self.percent())
            )
        }
    }
}

impl From<&OptimizationMeta> for ItemOutcome {
    fn from(meta: &OptimizationMeta) -> Self {
        Self {
            input_bytes: meta.input.bytes,
            output_bytes: meta.output.bytes,
        }
    }
}

/// Receives stage diagnostics
///
/// All methods default to doing nothing.
pub trait Reporter: Send + Sync {
    /// An item was passed through because its extension is not optimizable
    fn skipped(&self, _item: &WorkItem) {}

    /// An item came back from the remote transform
    fn optimized(&self, _item: &WorkItem, _outcome: &ItemOutcome) {}

    /// All items are done; called once per successful run
    fn finished(&self, _summary: &RunSummary) {}
}

/// Reporter that writes to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn skipped(&self, item: &WorkItem) {
        warn!(path = %item.path().display(), "Skipping unsupported file {}", item.relative().display());
    }

    fn optimized(&self, item: &WorkItem, outcome: &ItemOutcome) {
        info!(
            path = %item.path().display(),
            input_bytes = outcome.input_bytes,
            output_bytes = outcome.output_bytes,
            "{}: {}",
            item.relative().display(),
            outcome.message()
        );
    }

    fn finished(&self, summary: &RunSummary) {
        info!(
            items = summary.item_count,
            saved_bytes = summary.saved_bytes,
            "{}",
            summary.message()
        );
    }
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        let smaller = ItemOutcome { input_bytes: 1000, output_bytes: 800 };
        assert_eq!(smaller.message(), "saved 200 B (20.00%)");

        let same = ItemOutcome { input_bytes: 500, output_bytes: 500 };
        assert_eq!(same.message(), "already optimized");

        let bigger = ItemOutcome { input_bytes: 500, output_bytes: 600 };
        assert_eq!(bigger.message(), "already optimized");
    }

    #[test]
    fn test_outcome_from_meta() {
        let meta = OptimizationMeta::from_header(r#"{"input":{"bytes":2000},"output":{"bytes":500}}"#).unwrap();
        let outcome = ItemOutcome::from(&meta);
        assert_eq!(outcome.saved(), 1500);
        assert_eq!(outcome.message(), "saved 1.5 kB (75.00%)");
    }
}

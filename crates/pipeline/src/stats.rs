//! Run statistics

use optidash_core::format::{format_count, format_percent, percent_of, pretty_bytes};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Running totals over optimized items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Items that received a successful remote result
    pub item_count: u64,
    /// Sum of reported input sizes
    pub input_bytes: u64,
    /// Sum of reported output sizes
    pub output_bytes: u64,
}

impl RunStatistics {
    /// Add one optimized item
    pub fn record(&mut self, input_bytes: u64, output_bytes: u64) {
        self.item_count += 1;
        self.input_bytes = self.input_bytes.saturating_add(input_bytes);
        self.output_bytes = self.output_bytes.saturating_add(output_bytes);
    }

    /// Bytes saved; negative when outputs grew
    #[must_use]
    pub fn saved(&self) -> i64 {
        self.input_bytes as i64 - self.output_bytes as i64
    }

    /// Saved share of the input, 0 when nothing was recorded
    #[must_use]
    pub fn percent(&self) -> f64 {
        percent_of(self.saved(), self.input_bytes)
    }

    /// Freeze into a summary
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            item_count: self.item_count,
            input_bytes: self.input_bytes,
            output_bytes: self.output_bytes,
            saved_bytes: self.saved(),
            percent: self.percent(),
        }
    }
}

/// Statistics shared between concurrently completing transforms
#[derive(Debug, Clone, Default)]
pub struct SharedStatistics(Arc<Mutex<RunStatistics>>);

impl SharedStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, input_bytes: u64, output_bytes: u64) {
        self.lock().record(input_bytes, output_bytes);
    }

    /// Copy of the current totals
    #[must_use]
    pub fn snapshot(&self) -> RunStatistics {
        *self.lock()
    }

    // A panic while holding the lock cannot leave the totals half-written.
    fn lock(&self) -> MutexGuard<'_, RunStatistics> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// End-of-run totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub item_count: u64,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub saved_bytes: i64,
    pub percent: f64,
}

impl RunSummary {
    /// One-line summary, e.g. `Optimized 2 images | saved 200 B (13.33%)`
    ///
    /// The savings part is left out when nothing was optimized.
    #[must_use]
    pub fn message(&self) -> String {
        let count = format!("Optimized {}", format_count(self.item_count, "image", "images"));
        if self.item_count == 0 {
            return count;
        }
        format!(
            "{count} | saved {} ({}%)",
            pretty_bytes(self.saved_bytes),
            format_percent(self.percent)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_run() {
        let stats = RunStatistics::default();
        assert_eq!(stats.saved(), 0);
        assert_eq!(stats.percent(), 0.0);
        assert_eq!(stats.summary().message(), "Optimized 0 images");
    }

    #[test]
    fn test_record_and_summary() {
        let shared = SharedStatistics::new();
        shared.record(1000, 800);
        shared.record(500, 500);

        let stats = shared.snapshot();
        assert_eq!(stats.item_count, 2);
        assert_eq!(stats.input_bytes, 1500);
        assert_eq!(stats.output_bytes, 1300);
        assert_eq!(stats.saved(), 200);
        assert_eq!(stats.summary().message(), "Optimized 2 images | saved 200 B (13.33%)");
    }

    #[test]
    fn test_negative_savings() {
        let mut stats = RunStatistics::default();
        stats.record(100, 150);
        assert_eq!(stats.saved(), -50);
        assert_eq!(format_percent(stats.percent()), "-50.00");
        assert_eq!(stats.summary().message(), "Optimized 1 image | saved -50 B (-50.00%)");
    }

    #[test]
    fn test_summary_serializes() {
        let mut stats = RunStatistics::default();
        stats.record(10, 5);
        let json = serde_json::to_value(stats.summary()).unwrap();
        assert_eq!(json["item_count"], 1);
        assert_eq!(json["saved_bytes"], 5);
        assert_eq!(json["percent"], 50.0);
    }
}

use serde::Serialize;
use std::sync::Mutex;

/// Per-run counters, reported once the batch finishes.
pub struct MetricsRecorder {
    inner: Mutex<RunSummary>,
}

/// Outcome counts for one ingest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub considered: usize,
    pub already_processed: usize,
    pub dispatched: usize,
    pub merged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub catalog_retained: usize,
    pub catalog_removed: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RunSummary::default()),
        }
    }

    pub fn record_considered(&self) {
        self.update(|m| m.considered += 1);
    }

    pub fn record_already_processed(&self) {
        self.update(|m| m.already_processed += 1);
    }

    pub fn record_dispatched(&self) {
        self.update(|m| m.dispatched += 1);
    }

    pub fn record_merged(&self) {
        self.update(|m| m.merged += 1);
    }

    pub fn record_skipped(&self) {
        self.update(|m| m.skipped += 1);
    }

    pub fn record_failed(&self) {
        self.update(|m| m.failed += 1);
    }

    pub fn record_catalog(&self, retained: usize, removed: usize) {
        self.update(|m| {
            m.catalog_retained = retained;
            m.catalog_removed = removed;
        });
    }

    pub fn snapshot(&self) -> RunSummary {
        if let Ok(metrics) = self.inner.lock() {
            metrics.clone()
        } else {
            RunSummary::default()
        }
    }

    fn update(&self, apply: impl FnOnce(&mut RunSummary)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut *metrics);
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_accumulates_counts() {
        let metrics = MetricsRecorder::new();
        metrics.record_considered();
        metrics.record_considered();
        metrics.record_dispatched();
        metrics.record_skipped();
        metrics.record_catalog(10, 2);

        let summary = metrics.snapshot();
        assert_eq!(summary.considered, 2);
        assert_eq!(summary.dispatched, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.catalog_retained, 10);
        assert_eq!(summary.catalog_removed, 2);
    }
}

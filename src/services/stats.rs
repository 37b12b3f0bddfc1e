//! Cumulative run diagnostics.
//!
//! Skip conditions are silent at the data level, so this tracker is the
//! observability surface: every processing run folds its counters in,
//! and `GET /v1/stats` serves the totals.

use crate::error::SkipCounts;
use parking_lot::RwLock;
use std::sync::Arc;

/// Snapshot of the cumulative counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatsSnapshot {
    /// Files and images processed since startup.
    pub runs: u64,
    /// Entries that survived into output.
    pub entries: u64,
    /// Everything that was dropped, by reason.
    pub skips: SkipCounts,
}

/// Shared in-memory diagnostics tracker.
#[derive(Clone, Default)]
pub struct StatsTracker {
    inner: Arc<RwLock<StatsSnapshot>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one run's results into the totals.
    pub fn record_run(&self, entries: usize, skips: &SkipCounts) {
        let mut totals = self.inner.write();
        totals.runs += 1;
        totals.entries += entries as u64;
        totals.skips.merge(skips);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        *self.inner.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot() {
        let tracker = StatsTracker::new();
        let skips = SkipCounts {
            unparseable_time: 1,
            ..Default::default()
        };
        tracker.record_run(2, &skips);
        tracker.record_run(3, &SkipCounts::default());

        let snap = tracker.snapshot();
        assert_eq!(snap.runs, 2);
        assert_eq!(snap.entries, 5);
        assert_eq!(snap.skips.unparseable_time, 1);
    }

    #[test]
    fn test_tracker_clones_share_state() {
        let tracker = StatsTracker::new();
        let clone = tracker.clone();
        clone.record_run(1, &SkipCounts::default());
        assert_eq!(tracker.snapshot().runs, 1);
    }
}

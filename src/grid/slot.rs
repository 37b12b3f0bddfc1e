//! Slot indexing: canonical times to grid row indices.

use crate::config::SlotConfig;
use crate::models::ClockTime;
use std::ops::Range;

/// Maps canonical times onto rows of a fixed-resolution grid.
///
/// Indices are computed by rounding, not truncation, so times sitting
/// exactly on a slot boundary never fall into the wrong row through
/// floating-point drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotIndexer {
    config: SlotConfig,
}

impl SlotIndexer {
    pub fn new(config: SlotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    /// Row index of the slot containing the given time, or `None` when
    /// the time falls before the origin or past the last slot.
    pub fn index_of(&self, time: ClockTime) -> Option<usize> {
        let index = self.raw_index(time);
        if index < 0 || index >= self.config.slot_count as i64 {
            None
        } else {
            Some(index as usize)
        }
    }

    /// Half-open row range `[start_index, end_index)` covered by an
    /// entry.
    ///
    /// The slot beginning exactly at the end time is excluded: an entry
    /// from 8:00 to 9:00 at half-hour resolution fills rows {2, 3} only.
    /// The end is clipped to the grid. `None` means the entry cannot
    /// occupy any row (start outside the grid, or the range rounds to
    /// zero slots) and must be dropped and counted by the caller.
    pub fn span(&self, start: ClockTime, end: ClockTime) -> Option<Range<usize>> {
        let start_index = self.index_of(start)?;
        let end_index = self
            .raw_index(end)
            .clamp(start_index as i64, self.config.slot_count as i64) as usize;
        if end_index == start_index {
            return None;
        }
        Some(start_index..end_index)
    }

    /// Start time of a row, for display labels.
    pub fn row_time(&self, row: usize) -> ClockTime {
        ClockTime::from_minutes(self.config.origin_minutes + row as u32 * self.config.slot_minutes)
    }

    fn raw_index(&self, time: ClockTime) -> i64 {
        let offset = time.minutes_from_midnight() as f64 - self.config.origin_minutes as f64;
        (offset / self.config.slot_minutes as f64).round() as i64
    }
}

impl Default for SlotIndexer {
    fn default() -> Self {
        Self::new(SlotConfig::default())
    }
}

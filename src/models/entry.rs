//! Core data model shared by both pipelines.

use crate::error::PipelineError;
use crate::models::time::ClockTime;
use crate::models::weekday::Weekday;
use serde::{Deserialize, Serialize};

/// One normalized schedule record.
///
/// Instances are ephemeral: constructed per uploaded file and discarded
/// once the grid is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: Weekday,
    pub start: ClockTime,
    pub end: ClockTime,
    pub subject: String,
    pub room: String,
    /// Set by the visual pipeline when the block carries a diagonal cut
    /// (half-hour shifted occupancy). Structured input leaves it false.
    #[serde(default)]
    pub shifted: bool,
}

impl ScheduleEntry {
    /// Build an entry, enforcing the `start < end` invariant.
    pub fn new(
        day: Weekday,
        start: ClockTime,
        end: ClockTime,
        subject: impl Into<String>,
        room: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        if start >= end {
            return Err(PipelineError::MalformedInput(format!(
                "start {} is not before end {}",
                start, end
            )));
        }
        Ok(Self {
            day,
            start,
            end,
            subject: subject.into(),
            room: room.into(),
            shifted: false,
        })
    }

    /// Same entry with the shift flag set.
    pub fn with_shift(mut self, shifted: bool) -> Self {
        self.shifted = shifted;
        self
    }
}

/// A single cell of the schedule grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Slot index within the day (0-based from the grid origin).
    pub row: usize,
    /// Day index (0 = Monday).
    pub column: usize,
}

/// A colored block found in a schedule image, after cell classification.
///
/// Blocks below the noise floor never become `DetectedBlock`s; surviving
/// ones are mapped to a [`ScheduleEntry`] or dropped when OCR yields no
/// usable text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedBlock {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// `occupied_pixels / (width * height)`.
    pub solidity: f32,
    pub cell: GridCell,
    /// Number of consecutive grid rows the block covers (multi-hour
    /// classes cover more than one).
    pub row_span: usize,
    /// Half-hour shifted occupancy, per the solidity heuristic.
    pub shifted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> ClockTime {
        ClockTime::new(h, m).unwrap()
    }

    #[test]
    fn test_entry_requires_start_before_end() {
        let ok = ScheduleEntry::new(Weekday::Monday, t(7, 0), t(8, 0), "MATH 27", "CAS-B2");
        assert!(ok.is_ok());

        let inverted = ScheduleEntry::new(Weekday::Monday, t(9, 0), t(8, 0), "X", "Y");
        assert!(matches!(
            inverted,
            Err(crate::error::PipelineError::MalformedInput(_))
        ));

        let degenerate = ScheduleEntry::new(Weekday::Monday, t(8, 0), t(8, 0), "X", "Y");
        assert!(degenerate.is_err());
    }

    #[test]
    fn test_with_shift() {
        let entry = ScheduleEntry::new(Weekday::Friday, t(13, 0), t(14, 30), "PHYS 11", "NIP-101")
            .unwrap()
            .with_shift(true);
        assert!(entry.shifted);
    }
}

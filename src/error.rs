//! Error taxonomy for the extraction pipelines.
//!
//! Skip conditions (`UnparseableTime`, `OutOfGridRange`, `NoTextDetected`)
//! are silent at the data level: the offending row or block is dropped,
//! the skip is counted, and processing continues. Only `MalformedInput`
//! on the whole file surfaces to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while processing a schedule file or image.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A time string matched neither the 12-hour nor the bare 24-hour format.
    #[error("unparseable time string: {0:?}")]
    UnparseableTime(String),

    /// A computed (day, row) index fell outside the configured grid.
    #[error("cell (day {day}, row {row}) outside the configured grid")]
    OutOfGridRange { day: i64, row: i64 },

    /// OCR returned empty or whitespace-only text for a candidate block.
    #[error("no text detected in block")]
    NoTextDetected,

    /// A required column or key is missing, or the file cannot be read at all.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The uploaded image could not be decoded.
    #[error("image decode failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The OCR backend itself failed (not the same as producing no text).
    #[error("ocr backend failure: {0}")]
    Ocr(String),
}

/// Per-run skip counters, returned with every processing result so callers
/// can see how much of the input survived.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    /// Rows dropped because a time string could not be parsed.
    pub unparseable_time: u64,
    /// Entries dropped because they mapped outside the grid.
    pub out_of_grid_range: u64,
    /// Blocks dropped because OCR produced no usable text.
    pub no_text_detected: u64,
    /// Rows or elements dropped because of missing fields or bad structure.
    pub malformed_rows: u64,
}

impl SkipCounts {
    /// Record a skipped row or block under the matching counter.
    ///
    /// Decode and OCR backend failures are whole-file conditions and are
    /// not counted here.
    pub fn record(&mut self, err: &PipelineError) {
        match err {
            PipelineError::UnparseableTime(_) => self.unparseable_time += 1,
            PipelineError::OutOfGridRange { .. } => self.out_of_grid_range += 1,
            PipelineError::NoTextDetected => self.no_text_detected += 1,
            PipelineError::MalformedInput(_) => self.malformed_rows += 1,
            PipelineError::ImageDecode(_) | PipelineError::Ocr(_) => {}
        }
    }

    /// Sum of all counters.
    pub fn total(&self) -> u64 {
        self.unparseable_time + self.out_of_grid_range + self.no_text_detected + self.malformed_rows
    }

    /// Fold another set of counters into this one.
    pub fn merge(&mut self, other: &SkipCounts) {
        self.unparseable_time += other.unparseable_time;
        self.out_of_grid_range += other.out_of_grid_range;
        self.no_text_detected += other.no_text_detected;
        self.malformed_rows += other.malformed_rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_maps_to_counters() {
        let mut skips = SkipCounts::default();
        skips.record(&PipelineError::UnparseableTime("xx".into()));
        skips.record(&PipelineError::OutOfGridRange { day: 9, row: 0 });
        skips.record(&PipelineError::NoTextDetected);
        skips.record(&PipelineError::MalformedInput("missing Day".into()));

        assert_eq!(skips.unparseable_time, 1);
        assert_eq!(skips.out_of_grid_range, 1);
        assert_eq!(skips.no_text_detected, 1);
        assert_eq!(skips.malformed_rows, 1);
        assert_eq!(skips.total(), 4);
    }

    #[test]
    fn test_merge_adds_counters() {
        let mut a = SkipCounts {
            unparseable_time: 2,
            ..Default::default()
        };
        let b = SkipCounts {
            unparseable_time: 1,
            malformed_rows: 3,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.unparseable_time, 3);
        assert_eq!(a.malformed_rows, 3);
        assert_eq!(a.total(), 6);
    }
}

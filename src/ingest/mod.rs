//! Structured input: CSV and JSON schedule files.
//!
//! Both readers produce the same [`RawRecord`] shape; normalization into
//! [`ScheduleEntry`] values happens once, here, with row-level isolation:
//! one bad row never aborts the file, it is skipped and counted.

mod csv_input;
mod json_input;

pub use csv_input::read_csv;
pub use json_input::read_json;

use crate::error::{PipelineError, SkipCounts};
use crate::models::{ScheduleEntry, TimeNormalizer, Weekday};

/// One still-untyped row from a structured file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub day: String,
    pub start: String,
    pub end: String,
    pub subject: String,
    pub room: String,
}

/// Input format of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

/// Guess the format from a filename extension, falling back to sniffing
/// the first non-whitespace byte (JSON files open with `[` or `{`).
pub fn detect_format(file_name: Option<&str>, bytes: &[u8]) -> InputFormat {
    if let Some(name) = file_name {
        let lower = name.to_lowercase();
        if lower.ends_with(".json") {
            return InputFormat::Json;
        }
        if lower.ends_with(".csv") {
            return InputFormat::Csv;
        }
    }
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'[') | Some(b'{') => InputFormat::Json,
        _ => InputFormat::Csv,
    }
}

/// Read a structured file into raw records.
pub fn read_records(
    bytes: &[u8],
    format: InputFormat,
) -> Result<(Vec<RawRecord>, SkipCounts), PipelineError> {
    match format {
        InputFormat::Csv => read_csv(bytes),
        InputFormat::Json => read_json(bytes),
    }
}

/// Normalize raw records into schedule entries.
///
/// Rows with an unknown day, an unparseable time, or an inverted time
/// range are skipped and counted; everything else flows through.
pub fn normalize_records(
    records: Vec<RawRecord>,
    normalizer: &TimeNormalizer,
) -> (Vec<ScheduleEntry>, SkipCounts) {
    let mut entries = Vec::with_capacity(records.len());
    let mut skips = SkipCounts::default();

    for record in records {
        match normalize_one(&record, normalizer) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                tracing::debug!(error = %err, subject = %record.subject, "skipping row");
                skips.record(&err);
            }
        }
    }

    (entries, skips)
}

fn normalize_one(
    record: &RawRecord,
    normalizer: &TimeNormalizer,
) -> Result<ScheduleEntry, PipelineError> {
    let day = Weekday::parse(&record.day).ok_or_else(|| {
        PipelineError::MalformedInput(format!("unknown day value {:?}", record.day))
    })?;
    let start = normalizer.normalize(&record.start)?;
    let end = normalizer.normalize(&record.end)?;
    ScheduleEntry::new(
        day,
        start,
        end,
        record.subject.trim(),
        record.room.trim(),
    )
}

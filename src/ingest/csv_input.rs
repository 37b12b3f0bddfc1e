//! CSV input: `Day, Start Time, End Time, Class, Location`.

use super::RawRecord;
use crate::error::{PipelineError, SkipCounts};

const REQUIRED_COLUMNS: [&str; 5] = ["Day", "Start Time", "End Time", "Class", "Location"];

/// Read schedule rows from CSV bytes.
///
/// A missing required column is a file-level `MalformedInput` (no row
/// can be interpreted without it). Individual unreadable rows are
/// skipped and counted; the rest of the file still parses.
pub fn read_csv(bytes: &[u8]) -> Result<(Vec<RawRecord>, SkipCounts), PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::MalformedInput(format!("unreadable CSV header: {}", e)))?
        .clone();

    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                PipelineError::MalformedInput(format!("missing required column {:?}", name))
            })?;
    }
    let [day_at, start_at, end_at, class_at, location_at] = positions;

    let mut records = Vec::new();
    let mut skips = SkipCounts::default();
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable CSV row");
                skips.record(&PipelineError::MalformedInput(e.to_string()));
                continue;
            }
        };

        let field = |at: usize| row.get(at).unwrap_or("").to_string();
        if row.get(day_at).is_none() || row.get(start_at).is_none() || row.get(end_at).is_none() {
            skips.record(&PipelineError::MalformedInput("short row".into()));
            continue;
        }

        records.push(RawRecord {
            day: field(day_at),
            start: field(start_at),
            end: field(end_at),
            subject: field(class_at),
            room: field(location_at),
        });
    }

    Ok((records, skips))
}

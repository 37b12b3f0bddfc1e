//! JSON input: an array of `{day, startTime, endTime, subject, room}`.

use super::RawRecord;
use crate::error::{PipelineError, SkipCounts};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonRecord {
    day: String,
    start_time: String,
    end_time: String,
    subject: String,
    #[serde(default)]
    room: String,
}

/// Read schedule rows from a JSON array.
///
/// A top-level shape that is not an array is a file-level error.
/// Elements missing a required key are skipped and counted, keeping the
/// rest of the file alive.
pub fn read_json(bytes: &[u8]) -> Result<(Vec<RawRecord>, SkipCounts), PipelineError> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(bytes)
        .map_err(|e| PipelineError::MalformedInput(format!("expected a JSON array: {}", e)))?;

    let mut records = Vec::with_capacity(values.len());
    let mut skips = SkipCounts::default();
    for value in values {
        match serde_json::from_value::<JsonRecord>(value) {
            Ok(rec) => records.push(RawRecord {
                day: rec.day,
                start: rec.start_time,
                end: rec.end_time,
                subject: rec.subject,
                room: rec.room,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed JSON element");
                skips.record(&PipelineError::MalformedInput(e.to_string()));
            }
        }
    }

    Ok((records, skips))
}

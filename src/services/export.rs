//! Export surfaces: busy-slot identifiers and CSV.

use crate::error::PipelineError;
use crate::models::{ClockTime, ScheduleEntry, Weekday};
use std::collections::HashSet;

/// Busy-slot identifier for one occupied half-hour interval.
///
/// Format matches the slot ids the HTML grid uses: full weekday name,
/// 12-hour display hour without padding, zero-padded minutes, and the
/// meridian, e.g. `"Monday-800AM"` or `"Thursday-1230PM"`.
pub fn slot_id(day: Weekday, time: ClockTime) -> String {
    let hour = time.hour();
    let meridian = if hour < 12 { "AM" } else { "PM" };
    let display_hour = if hour > 12 {
        hour - 12
    } else if hour == 0 {
        12
    } else {
        hour
    };
    format!("{}-{}{:02}{}", day.name(), display_hour, time.minute(), meridian)
}

/// Expand entries into deduplicated busy-slot ids, one per 30-minute
/// interval spanned, in first-seen order.
pub fn busy_slot_ids(entries: &[ScheduleEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for entry in entries {
        let mut current = entry.start;
        while current < entry.end {
            let id = slot_id(entry.day, current);
            if seen.insert(id.clone()) {
                ids.push(id);
            }
            current = current.plus_minutes(30);
        }
    }
    ids
}

/// Sort entries for display: day order Monday→Saturday, then ascending
/// start time.
pub fn sort_for_display(entries: &mut [ScheduleEntry]) {
    entries.sort_by_key(|e| (e.day, e.start));
}

/// Render entries as CSV (`text/csv`, header row, one row per entry).
pub fn entries_to_csv(entries: &[ScheduleEntry]) -> Result<String, PipelineError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Day", "Start Time", "End Time", "Class", "Location", "Shift"])
        .map_err(|e| PipelineError::MalformedInput(format!("csv write failed: {}", e)))?;

    for entry in entries {
        let shift = if entry.shifted { "30-min Shift" } else { "Full Hour" };
        writer
            .write_record([
                entry.day.name(),
                &entry.start.to_string(),
                &entry.end.to_string(),
                &entry.subject,
                &entry.room,
                shift,
            ])
            .map_err(|e| PipelineError::MalformedInput(format!("csv write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::MalformedInput(format!("csv flush failed: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| PipelineError::MalformedInput(format!("csv not utf-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> ClockTime {
        ClockTime::new(h, m).unwrap()
    }

    fn entry(day: Weekday, start: ClockTime, end: ClockTime, subject: &str) -> ScheduleEntry {
        ScheduleEntry::new(day, start, end, subject, "R1").unwrap()
    }

    #[test]
    fn test_slot_id_format() {
        assert_eq!(slot_id(Weekday::Monday, t(8, 0)), "Monday-800AM");
        assert_eq!(slot_id(Weekday::Monday, t(8, 30)), "Monday-830AM");
        assert_eq!(slot_id(Weekday::Thursday, t(12, 30)), "Thursday-1230PM");
        assert_eq!(slot_id(Weekday::Friday, t(17, 0)), "Friday-500PM");
        assert_eq!(slot_id(Weekday::Saturday, t(0, 0)), "Saturday-1200AM");
    }

    #[test]
    fn test_busy_slots_one_per_half_hour() {
        let entries = vec![entry(Weekday::Monday, t(8, 0), t(9, 30), "MATH 27")];
        assert_eq!(
            busy_slot_ids(&entries),
            vec!["Monday-800AM", "Monday-830AM", "Monday-900AM"]
        );
    }

    #[test]
    fn test_busy_slots_deduplicated_across_entries() {
        let entries = vec![
            entry(Weekday::Monday, t(8, 0), t(9, 0), "MATH 27"),
            entry(Weekday::Monday, t(8, 30), t(9, 30), "PHYS 11"),
        ];
        assert_eq!(
            busy_slot_ids(&entries),
            vec![
                "Monday-800AM",
                "Monday-830AM",
                "Monday-900AM",
            ]
        );
    }

    #[test]
    fn test_sort_for_display() {
        let mut entries = vec![
            entry(Weekday::Friday, t(8, 0), t(9, 0), "B"),
            entry(Weekday::Monday, t(10, 0), t(11, 0), "C"),
            entry(Weekday::Monday, t(7, 0), t(8, 0), "A"),
        ];
        sort_for_display(&mut entries);
        let subjects: Vec<&str> = entries.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(subjects, ["A", "C", "B"]);
    }

    #[test]
    fn test_csv_export_shape() {
        let entries = vec![
            entry(Weekday::Monday, t(7, 0), t(8, 0), "MATH 27"),
            entry(Weekday::Tuesday, t(13, 0), t(14, 30), "PHYS 11").with_shift(true),
        ];
        let out = entries_to_csv(&entries).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Day,Start Time,End Time,Class,Location,Shift");
        assert_eq!(lines[1], "Monday,07:00,08:00,MATH 27,R1,Full Hour");
        assert_eq!(lines[2], "Tuesday,13:00,14:30,PHYS 11,R1,30-min Shift");
    }
}

//! Canonical clock time and heterogeneous time-string normalization.
//!
//! Structured schedule exports carry times in wildly inconsistent
//! formats: `"10:00 AM"`, `"05:30PM"`, `"11:30 "`, `"5:00"`. The
//! normalizer folds them all into a canonical [`ClockTime`] or reports
//! the string as unparseable so the caller can skip the row.

use crate::error::PipelineError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical wall-clock time (hour 0–23, minute 0–59).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Create a clock time, rejecting out-of-range components.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                hour: hour as u8,
                minute: minute as u8,
            })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    /// Minutes since midnight.
    pub fn minutes_from_midnight(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    /// Clock time from minutes since midnight, wrapping at 24h.
    pub fn from_minutes(minutes: u32) -> Self {
        let m = minutes % (24 * 60);
        Self {
            hour: (m / 60) as u8,
            minute: (m % 60) as u8,
        }
    }

    /// Time advanced by the given number of minutes, wrapping at 24h.
    pub fn plus_minutes(&self, minutes: u32) -> Self {
        Self::from_minutes(self.minutes_from_midnight() + minutes)
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(t: NaiveTime) -> Self {
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Normalizes heterogeneous time strings into [`ClockTime`] values.
///
/// Parsing strategy, in order:
/// 1. Trim, uppercase, and insert a separating space before a trailing
///    `AM`/`PM` token if absent.
/// 2. Strict 12-hour parse (`hour:minute AM/PM`).
/// 3. Bare 24-hour parse (`hour:minute`), with the heuristic that bare
///    hours `1..=pm_cutoff_hour` denote afternoon/evening and are
///    shifted by +12; hour 12 stays unchanged.
///
/// Failure of both parses yields [`PipelineError::UnparseableTime`]; the
/// caller treats that as "no time" and skips the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeNormalizer {
    /// Highest bare hour assumed to be PM (deployments use 6 or 7).
    pub pm_cutoff_hour: u32,
}

impl Default for TimeNormalizer {
    fn default() -> Self {
        Self { pm_cutoff_hour: 6 }
    }
}

impl TimeNormalizer {
    pub fn new(pm_cutoff_hour: u32) -> Self {
        Self { pm_cutoff_hour }
    }

    /// Parse a raw time string into a canonical time.
    pub fn normalize(&self, raw: &str) -> Result<ClockTime, PipelineError> {
        let upper = raw.trim().to_uppercase();
        if upper.is_empty() {
            return Err(PipelineError::UnparseableTime(raw.to_string()));
        }

        let spaced = insert_meridian_space(&upper);

        if let Ok(t) = NaiveTime::parse_from_str(&spaced, "%I:%M %p") {
            return Ok(t.into());
        }

        if let Ok(t) = NaiveTime::parse_from_str(&upper, "%H:%M") {
            let hour = t.hour();
            if (1..=self.pm_cutoff_hour).contains(&hour) {
                // Bare "5:00" on a class schedule means 17:00, never dawn.
                return ClockTime::new(hour + 12, t.minute())
                    .ok_or_else(|| PipelineError::UnparseableTime(raw.to_string()));
            }
            return Ok(t.into());
        }

        Err(PipelineError::UnparseableTime(raw.to_string()))
    }
}

/// `"05:30PM"` → `"05:30 PM"`; strings already spaced pass through.
fn insert_meridian_space(upper: &str) -> String {
    if upper.len() > 2 && (upper.ends_with("AM") || upper.ends_with("PM")) {
        let (head, tail) = upper.split_at(upper.len() - 2);
        if !head.ends_with(' ') {
            return format!("{} {}", head.trim_end(), tail);
        }
    }
    upper.to_string()
}

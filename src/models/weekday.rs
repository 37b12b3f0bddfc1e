//! Six-day weekday set used by the schedule grid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A weekday column of the schedule grid.
///
/// The variant order is the fixed display order (Monday through
/// Saturday); `Ord` follows it, so sorting entries by day needs no
/// separate key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All weekdays in display order.
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Parse a day value from structured input.
    ///
    /// Accepts full weekday names (any case) and the AMIS-style
    /// shorthand: M, T, W, TH, F, S.
    pub fn parse(raw: &str) -> Option<Weekday> {
        match raw.trim().to_uppercase().as_str() {
            "M" | "MONDAY" => Some(Weekday::Monday),
            "T" | "TUESDAY" => Some(Weekday::Tuesday),
            "W" | "WEDNESDAY" => Some(Weekday::Wednesday),
            "TH" | "THURSDAY" => Some(Weekday::Thursday),
            "F" | "FRIDAY" => Some(Weekday::Friday),
            "S" | "SATURDAY" => Some(Weekday::Saturday),
            _ => None,
        }
    }

    /// Column index in the assembled grid (0 = Monday).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Weekday for a grid column index.
    pub fn from_index(index: usize) -> Option<Weekday> {
        Weekday::ALL.get(index).copied()
    }

    /// Full weekday name, as used in busy-slot identifiers.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

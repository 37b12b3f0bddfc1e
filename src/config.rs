//! Per-run configuration objects.
//!
//! The prototype scripts this engine replaces hard-coded a "7 columns /
//! 13 rows" layout and green HSV bounds as module-level constants. Here
//! every tunable lives in an immutable configuration value constructed
//! once per run and passed into the pipeline stages.

use serde::{Deserialize, Serialize};

/// Inclusive HSV band used to isolate class-block pixels.
///
/// Hue is in degrees (0–360), saturation and value are normalized to
/// 0.0–1.0. The defaults target the dark-green blocks of the supported
/// schedule layout. The hue lower bound is the usual "sensitivity" knob:
/// widening the band trades false negatives for false positives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvBand {
    pub hue_low: f32,
    pub hue_high: f32,
    pub sat_low: f32,
    pub sat_high: f32,
    pub val_low: f32,
    pub val_high: f32,
}

impl Default for HsvBand {
    fn default() -> Self {
        // Green band of the reference schedules: H 70-170deg,
        // S >= 0.157, V 0.157-0.588.
        Self {
            hue_low: 70.0,
            hue_high: 170.0,
            sat_low: 0.157,
            sat_high: 1.0,
            val_low: 0.157,
            val_high: 0.588,
        }
    }
}

impl HsvBand {
    /// True when the given HSV triple falls inside the band.
    pub fn contains(&self, hue: f32, sat: f32, val: f32) -> bool {
        hue >= self.hue_low
            && hue <= self.hue_high
            && sat >= self.sat_low
            && sat <= self.sat_high
            && val >= self.val_low
            && val <= self.val_high
    }
}

/// Geometry of the schedule grid inside the image.
///
/// `columns` and `rows` count the full table including the leading time
/// column and header row; `day_count` and `rows_per_day` describe the
/// interior cells that can hold classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Total table columns, including the leading time column.
    pub columns: usize,
    /// Total table rows, including the header row.
    pub rows: usize,
    /// Number of weekday columns (interior columns).
    pub day_count: usize,
    /// Fraction of image height taken by the header row.
    pub header_fraction: f32,
    /// Fraction of image width taken by the time column.
    pub left_fraction: f32,
    /// Fixed-grid mode: fraction of mask-true pixels required to call a
    /// cell occupied.
    pub occupancy_threshold: f32,
    /// Contour mode noise floor: regions narrower than this fraction of
    /// image width are dropped.
    pub min_region_width_frac: f32,
    /// Contour mode noise floor: regions shorter than this fraction of
    /// image height are dropped.
    pub min_region_height_frac: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 7,
            rows: 13,
            day_count: 6,
            header_fraction: 1.0 / 13.0,
            left_fraction: 1.0 / 7.0,
            occupancy_threshold: 0.25,
            min_region_width_frac: 0.03,
            min_region_height_frac: 0.02,
        }
    }
}

impl GridLayout {
    /// Interior rows that can hold classes.
    pub fn rows_per_day(&self) -> usize {
        self.rows.saturating_sub(1)
    }
}

/// Time-axis resolution of the assembled grid.
///
/// The grid resolution is a configuration choice, never inferred from
/// the data: both half-hour and hourly deployments exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Minutes from midnight of the first slot (grid origin).
    pub origin_minutes: u32,
    /// Slot size in minutes (30 or 60).
    pub slot_minutes: u32,
    /// Number of slots in the grid.
    pub slot_count: usize,
}

impl SlotConfig {
    /// Half-hour resolution over the 7:00–19:00 envelope (24 slots).
    pub fn half_hour() -> Self {
        Self {
            origin_minutes: 7 * 60,
            slot_minutes: 30,
            slot_count: 24,
        }
    }

    /// Hourly resolution over the 7:00–19:00 envelope (12 slots).
    pub fn hourly() -> Self {
        Self {
            origin_minutes: 7 * 60,
            slot_minutes: 60,
            slot_count: 12,
        }
    }
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self::half_hour()
    }
}

/// Tunables for the half-hour shift heuristic.
///
/// The solidity cutoff is deliberately exposed rather than hard-coded:
/// observed deployments ranged from 0.75 to 0.90 and the right value
/// depends on render quality, so it must be calibratable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftConfig {
    /// Blocks with solidity below this are classified as half-hour shifted.
    pub solidity_threshold: f32,
    /// Side length in pixels of the corner sample patches.
    pub corner_patch: u32,
    /// Brightness midpoint: a corner patch averaging below this on the
    /// mask is considered cut away.
    pub corner_midpoint: u8,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            solidity_threshold: 0.88,
            corner_patch: 10,
            corner_midpoint: 127,
        }
    }
}

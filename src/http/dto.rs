//! Data Transfer Objects for the HTTP API.

use crate::error::SkipCounts;
use crate::models::ScheduleEntry;
use crate::services::{ImageBlockRecord, StatsSnapshot};
use serde::{Deserialize, Serialize};

/// Response for `POST /process`: one id per occupied 30-minute slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusySlotsResponse {
    pub busy_slots: Vec<String>,
}

/// Response for `POST /v1/grid`: the assembled matrix plus diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridResponse {
    pub rows: usize,
    pub columns: usize,
    /// Start-time label per row ("07:00", "07:30", ...).
    pub row_labels: Vec<String>,
    /// Cell text per row×column, stacked subjects joined with " / ".
    pub cells: Vec<Vec<String>>,
    pub entries: Vec<ScheduleEntry>,
    pub skips: SkipCounts,
}

/// Response for `POST /v1/analyze-image`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeImageResponse {
    pub blocks: Vec<ImageBlockRecord>,
    pub entries: Vec<ScheduleEntry>,
    pub skips: SkipCounts,
}

/// Response for `GET /v1/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub totals: StatsSnapshot,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
}

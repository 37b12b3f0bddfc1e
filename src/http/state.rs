//! Application state for the HTTP server.

use crate::services::{ImageProcessor, ScheduleProcessor, StatsTracker};
use std::sync::Arc;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Temporal pipeline for structured uploads.
    pub processor: Arc<ScheduleProcessor>,
    /// Visual pipeline for image uploads.
    pub image_processor: Arc<ImageProcessor>,
    /// Cumulative run diagnostics.
    pub stats: StatsTracker,
}

impl AppState {
    pub fn new(processor: ScheduleProcessor, image_processor: ImageProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
            image_processor: Arc::new(image_processor),
            stats: StatsTracker::new(),
        }
    }
}

//! Service layer: pipeline orchestration, exports, and run diagnostics.

pub mod export;
pub mod processor;
pub mod stats;

pub use export::{busy_slot_ids, entries_to_csv, slot_id, sort_for_display};
pub use processor::{
    ImageAnalysis, ImageBlockRecord, ImageProcessor, LocatorMode, ProcessOutcome,
    ScheduleProcessor,
};
pub use stats::{StatsSnapshot, StatsTracker};

//! Temporal grid model: slot indexing and grid assembly.

pub mod assemble;
pub mod slot;

pub use assemble::{GridAssembler, ScheduleGrid};
pub use slot::SlotIndexer;

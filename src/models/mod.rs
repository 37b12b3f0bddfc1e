pub mod entry;
pub mod time;
pub mod weekday;

pub use entry::*;
pub use time::*;
pub use weekday::*;

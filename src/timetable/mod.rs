pub mod filter;
pub mod ics;
pub mod merge;
pub mod model;
pub mod parser;
pub mod sheet;

pub use model::{day_index, time_index, Block, RawSlot, TimetableGrid, DAYS, TIME_SLOTS};

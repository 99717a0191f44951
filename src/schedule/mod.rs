//! Turns recurring item definitions into dated occurrences for a year.

pub mod expander;
pub mod synchronizer;

pub use expander::{expand, expand_item, is_beyond_end_date};
pub use synchronizer::{ScheduleSynchronizer, SyncFailure, SyncReport, SyncStage, YearReport};

#![doc(test(attr(deny(warnings))))]

//! Finance Tracker keeps recurring incomes and expenses and expands them into
//! dated occurrences, one calendar year at a time.
//!
//! The interesting part lives in [`schedule`]: [`schedule::expand`] turns a
//! recurrence rule into the dates it falls on within a year, and
//! [`schedule::ScheduleSynchronizer`] rewrites the unconfirmed occurrences of
//! every active item through a [`storage::ScheduleStore`].

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod schedule;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance tracker tracing initialized.");
    });
}

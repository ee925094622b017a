//! Session History Log
//!
//! Bounded, time-ordered record of one snapshot-derived entry per second,
//! folded into summary statistics when a session stops.

mod log;

pub use log::{
    round2, EntryStatus, HistoryEntry, HistoryLog, SessionSummary, DEFAULT_CAPACITY,
};

use thiserror::Error;

/// History log errors
#[derive(Debug, Error)]
pub enum LogError {
    #[error("History lock poisoned: {0}")]
    Lock(String),
}

//! Drowsiness Engine
//!
//! The debounce state machine at the center of the monitor: consumes one
//! metric triple per capture tick, suppresses single-frame noise by requiring
//! a run of consecutive closed-eye ticks, accumulates a severity score, and
//! decides what the alert actuator should do.

pub mod config;
pub mod engine;

pub use config::EngineConfig;
pub use engine::{AlertAction, DebounceEngine, TickVerdict};

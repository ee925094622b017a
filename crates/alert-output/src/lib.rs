//! Alert Output
//!
//! Boundary to the audible alert actuator. Engage/disengage are idempotent,
//! and a missing actuator degrades to silent operation instead of failing
//! startup.

mod output;

pub use output::{AlertOutput, AlertSink, LoggingAlertSink};

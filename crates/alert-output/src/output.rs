//! Alert output implementation

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Audio actuator contract. Implementations live outside the workspace;
/// `play` is only called on the not-playing -> playing transition, `stop`
/// only on the reverse.
pub trait AlertSink: Send + Sync {
    fn play(&self);
    fn stop(&self);
}

/// Idempotent wrapper around an optional actuator.
///
/// `None` models a missing audio asset: logged once at construction, then
/// the output stays silent for the process lifetime.
pub struct AlertOutput {
    sink: Option<Box<dyn AlertSink>>,
    engaged: AtomicBool,
}

impl AlertOutput {
    pub fn new(sink: Option<Box<dyn AlertSink>>) -> Self {
        if sink.is_none() {
            warn!("no alert actuator configured, audio disabled");
        }
        Self {
            sink,
            engaged: AtomicBool::new(false),
        }
    }

    /// Output with no actuator, silent for the process lifetime
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Start the alert unless it is already playing
    pub fn engage(&self) {
        if !self.engaged.swap(true, Ordering::SeqCst) {
            if let Some(sink) = &self.sink {
                sink.play();
            }
        }
    }

    /// Silence the alert if it is playing
    pub fn disengage(&self) {
        if self.engaged.swap(false, Ordering::SeqCst) {
            if let Some(sink) = &self.sink {
                sink.stop();
            }
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::SeqCst)
    }
}

/// Stand-in actuator that logs transitions instead of playing audio
pub struct LoggingAlertSink;

impl AlertSink for LoggingAlertSink {
    fn play(&self) {
        info!("alert engaged");
    }

    fn stop(&self) {
        info!("alert silenced");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingSink {
        plays: AtomicUsize,
        stops: AtomicUsize,
    }

    impl AlertSink for Arc<CountingSink> {
        fn play(&self) {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn engage_is_idempotent() {
        let counter = Arc::new(CountingSink::default());
        let output = AlertOutput::new(Some(Box::new(Arc::clone(&counter))));

        output.engage();
        output.engage();
        output.engage();

        assert_eq!(counter.plays.load(Ordering::SeqCst), 1);
        assert!(output.is_engaged());
    }

    #[test]
    fn disengage_only_fires_after_engage() {
        let counter = Arc::new(CountingSink::default());
        let output = AlertOutput::new(Some(Box::new(Arc::clone(&counter))));

        output.disengage();
        assert_eq!(counter.stops.load(Ordering::SeqCst), 0);

        output.engage();
        output.disengage();
        output.disengage();
        assert_eq!(counter.stops.load(Ordering::SeqCst), 1);
        assert!(!output.is_engaged());
    }

    #[test]
    fn disabled_output_is_silent() {
        let output = AlertOutput::disabled();
        output.engage();
        output.disengage();
        assert!(!output.is_engaged());
    }
}

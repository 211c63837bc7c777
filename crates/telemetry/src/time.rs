// Path: crates/telemetry/src/time.rs
use crate::sinks::VoteExtMetricsSink;
use std::time::Instant;

/// Observes the wall-clock duration of a consensus callback when dropped.
pub struct Timer<'a> {
    sink: &'a dyn VoteExtMetricsSink,
    callback: &'static str,
    start: Instant,
}

impl<'a> Timer<'a> {
    pub fn new(sink: &'a dyn VoteExtMetricsSink, callback: &'static str) -> Self {
        Self {
            sink,
            callback,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_callback_duration(self.callback, self.start.elapsed().as_secs_f64());
    }
}

use log::{log_enabled, trace, Level};
use std::time::Instant;

/// Scoped timer that traces how long a section took when trace logging is on.
pub struct ScopedTimer {
    label: &'static str,
    start: Option<Instant>,
}

impl ScopedTimer {
    pub fn new(label: &'static str) -> Self {
        let start = log_enabled!(Level::Trace).then(Instant::now);
        Self { label, start }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(start) = self.start {
            trace!("{} took {} µs", self.label, start.elapsed().as_micros());
        }
    }
}

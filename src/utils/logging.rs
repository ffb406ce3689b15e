use log::{log_enabled, warn, Level};
use std::time::{Duration, Instant};

/// Scoped timer for profiling critical sections.
///
/// Logs at trace level; with a budget attached it also warns when the scope
/// outlives it.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
    budget_ms: Option<f32>,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("⏱️ start {label}");
        }
        Self {
            label,
            start: Instant::now(),
            budget_ms: None,
        }
    }

    pub fn with_budget(label: &'a str, budget_ms: f32) -> Self {
        let mut timer = Self::new(label);
        timer.budget_ms = Some(budget_ms);
        timer
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if log_enabled!(Level::Trace) {
            log::trace!("⏱️ end {} ({} µs)", self.label, elapsed.as_micros());
        }
        if let Some(budget_ms) = self.budget_ms {
            warn_if_frame_budget_exceeded(self.label, elapsed, budget_ms);
        }
    }
}

/// Logs a warning when `duration` exceeds the frame budget. Returns whether it did.
pub fn warn_if_frame_budget_exceeded(label: &str, duration: Duration, budget_ms: f32) -> bool {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if elapsed_ms > budget_ms {
        warn!("{label} exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_check_compares_milliseconds() {
        assert!(warn_if_frame_budget_exceeded(
            "tick",
            Duration::from_millis(5),
            4.0
        ));
        assert!(!warn_if_frame_budget_exceeded(
            "tick",
            Duration::from_millis(3),
            4.0
        ));
    }
}

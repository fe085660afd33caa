//! Throttled step clock.
//!
//! The host calls [`Clock::advance`] from whatever callback it has (an
//! animation frame, a timer, a CLI loop) with a monotonic timestamp in
//! seconds. The clock decides whether enough time has passed for a step and
//! how long that step is.

use super::DEFAULT_MIN_INTERVAL;

/// Step clock with a minimum firing interval.
#[derive(Debug, Clone)]
pub struct Clock {
    min_interval: f64,
    reference: Option<f64>,
    paused: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl Clock {
    /// Create a clock. A non-finite or negative interval falls back to the default.
    pub fn new(min_interval: f64) -> Self {
        let min_interval = if min_interval.is_finite() && min_interval >= 0.0 {
            min_interval
        } else {
            DEFAULT_MIN_INTERVAL
        };
        Self {
            min_interval,
            reference: None,
            paused: false,
        }
    }

    /// Minimum time between steps (s).
    pub fn min_interval(&self) -> f64 {
        self.min_interval
    }

    /// Offer a timestamp; returns the elapsed step duration if the clock fires.
    pub fn advance(&mut self, now: f64) -> Option<f64> {
        if !now.is_finite() {
            return None;
        }

        let reference = match self.reference {
            Some(r) if !self.paused && now >= r => r,
            _ => {
                // First call, paused, or time went backwards
                self.reference = Some(now);
                return None;
            }
        };

        let elapsed = now - reference;
        if elapsed < self.min_interval {
            return None;
        }

        self.reference = Some(now);
        Some(elapsed)
    }

    /// Stop firing. The next call after [`Clock::resume`] only rebases.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume firing without a catch-up step.
    pub fn resume(&mut self) {
        self.paused = false;
        self.reference = None;
    }

    /// Forget the reference time.
    pub fn reset(&mut self) {
        self.reference = None;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

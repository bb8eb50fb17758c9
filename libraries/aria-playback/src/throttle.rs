//! Leading-edge rate limiter for progress display updates

/// Lets one call through per interval; calls inside the window are dropped
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last_fired_ms: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: f64::from(interval_ms),
            last_fired_ms: None,
        }
    }

    /// Returns true (and opens a new window) if a call at `now_ms` may run
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_fired_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_fired_ms = Some(now_ms);
                true
            }
        }
    }

    /// Forget the current window
    pub fn reset(&mut self) {
        self.last_fired_ms = None;
    }
}

use foundation::time::Time;

/// Detects a double tap from touch-end timestamps.
///
/// Two taps count when the gap is strictly positive and below the window; the
/// detector then resets so a third tap starts a new pair.
#[derive(Debug, Clone)]
pub struct DoubleTapDetector {
    window_ms: f64,
    last_tap: Option<Time>,
}

impl DoubleTapDetector {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            last_tap: None,
        }
    }

    /// Registers a tap; returns true if it completes a double tap.
    pub fn register(&mut self, now: Time) -> bool {
        if let Some(last) = self.last_tap {
            let gap_ms = now.since(last) * 1000.0;
            if gap_ms > 0.0 && gap_ms < self.window_ms {
                self.last_tap = None;
                return true;
            }
        }
        self.last_tap = Some(now);
        false
    }

    pub fn reset(&mut self) {
        self.last_tap = None;
    }
}

use foundation::math::easing::{lerp, smoothstep};
use foundation::time::{Time, TimeSpan};

/// Smoothstep-eased scalar animation over a fixed span.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween {
    pub span: TimeSpan,
    pub from: f64,
    pub to: f64,
}

impl Tween {
    pub fn new(start: Time, duration_ms: f64, from: f64, to: f64) -> Self {
        Self {
            span: TimeSpan::starting_at(start, duration_ms),
            from,
            to,
        }
    }

    /// Eased progress in `[0, 1]`.
    pub fn eased(&self, now: Time) -> f64 {
        smoothstep(self.span.progress(now))
    }

    pub fn value(&self, now: Time) -> f64 {
        lerp(self.from, self.to, self.eased(now))
    }

    pub fn is_finished(&self, now: Time) -> bool {
        self.span.is_finished(now)
    }
}

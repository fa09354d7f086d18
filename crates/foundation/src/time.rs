/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn from_ms(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn as_ms(self) -> f64 {
        self.0 * 1000.0
    }

    pub fn after_ms(self, ms: f64) -> Self {
        Time(self.0 + ms / 1000.0)
    }

    /// Seconds elapsed since `earlier`; negative if `earlier` is in the future.
    pub fn since(self, earlier: Time) -> f64 {
        self.0 - earlier.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn starting_at(start: Time, duration_ms: f64) -> Self {
        Self {
            start,
            end: start.after_ms(duration_ms.max(0.0)),
        }
    }

    pub fn instant(t: Time) -> Self {
        Self { start: t, end: t }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Linear progress of `t` through the span, clamped to `[0, 1]`.
    ///
    /// A zero-length span is complete as soon as `t` reaches it.
    pub fn progress(&self, t: Time) -> f64 {
        let d = self.duration();
        if d <= 0.0 {
            return if t.0 >= self.start.0 { 1.0 } else { 0.0 };
        }
        ((t.0 - self.start.0) / d).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, t: Time) -> bool {
        t.0 >= self.end.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Time, TimeSpan};

    #[test]
    fn progress_clamps_outside_span() {
        let span = TimeSpan::starting_at(Time(1.0), 500.0);
        assert_eq!(span.progress(Time(0.0)), 0.0);
        assert_eq!(span.progress(Time(1.25)), 0.5);
        assert_eq!(span.progress(Time(9.0)), 1.0);
        assert!(span.is_finished(Time(1.5)));
    }

    #[test]
    fn instant_span_completes_immediately() {
        let span = TimeSpan::instant(Time(2.0));
        assert_eq!(span.duration(), 0.0);
        assert_eq!(span.progress(Time(1.9)), 0.0);
        assert_eq!(span.progress(Time(2.0)), 1.0);
    }

    #[test]
    fn ms_conversions() {
        assert_eq!(Time::from_ms(1500.0), Time(1.5));
        assert_eq!(Time(0.3).after_ms(200.0).as_ms().round(), 500.0);
        assert_eq!(Time(2.0).since(Time(0.5)), 1.5);
    }
}

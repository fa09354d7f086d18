use foundation::time::Time;

/// Longest step a single frame may advance; larger gaps (tab in background)
/// are treated as one slow frame.
pub const MAX_FRAME_DT_S: f64 = 0.25;

/// Frame metadata handed to every per-frame update.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta since the previous frame (seconds).
    pub dt_s: f64,
    /// Time at the start of the frame (seconds).
    pub time: Time,
}

/// Turns host timestamps (e.g. `requestAnimationFrame` milliseconds) into
/// frames. Non-monotonic timestamps never move time backwards.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<Frame>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, timestamp_ms: f64) -> Frame {
        let now = Time::from_ms(timestamp_ms);
        let frame = match self.last {
            None => Frame {
                index: 0,
                dt_s: 0.0,
                time: now,
            },
            Some(prev) => {
                let dt = now.since(prev.time).clamp(0.0, MAX_FRAME_DT_S);
                Frame {
                    index: prev.index + 1,
                    dt_s: dt,
                    time: if now.0 > prev.time.0 { now } else { prev.time },
                }
            }
        };
        self.last = Some(frame);
        frame
    }

    pub fn last(&self) -> Option<Frame> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameClock, MAX_FRAME_DT_S};
    use foundation::time::Time;

    #[test]
    fn clock_follows_host_timestamps() {
        let mut clock = FrameClock::new();
        let f0 = clock.advance(1000.0);
        assert_eq!(f0.index, 0);
        assert_eq!(f0.time, Time(1.0));

        let f1 = clock.advance(1016.0);
        assert_eq!(f1.index, 1);
        assert!((f1.dt_s - 0.016).abs() < 1e-9);

        let f2 = clock.advance(5000.0);
        assert_eq!(f2.dt_s, MAX_FRAME_DT_S);
        assert_eq!(f2.time, Time(5.0));
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut clock = FrameClock::new();
        clock.advance(2000.0);
        let f = clock.advance(1500.0);
        assert_eq!(f.dt_s, 0.0);
        assert_eq!(f.time, Time(2.0));
    }
}

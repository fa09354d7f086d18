use crate::config::PrismConfig;

/// What the finger landed on at touch start.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// Scrollable content (feed, timeline list, columns).
    Scrollable,
    /// The embedded mini globe; owns its own drag semantics.
    MiniGlobe,
    Other,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Result of a move event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SwipeUpdate {
    /// Not tracking, or the axis is still undecided.
    Idle,
    /// Locked horizontal; prism follows the finger by `dx_px`.
    Dragging { dx_px: f64 },
    /// Locked vertical; native scrolling owns the gesture.
    Scrolling,
}

/// Result of lifting the finger.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Gesture was not a horizontal swipe.
    None,
    Next,
    Previous,
    /// Horizontal but short: return to the current face.
    SnapBack,
}

#[derive(Debug, Copy, Clone)]
struct Touch {
    start_x: f64,
    start_y: f64,
    bias: f64,
    lock_px: f64,
    axis: Option<Axis>,
    dx: f64,
}

/// Splits touch gestures between face rotation and content scrolling.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    touch: Option<Touch>,
}

impl SwipeTracker {
    pub fn start(&mut self, x: f64, y: f64, hit: HitTarget, config: &PrismConfig) {
        let (bias, lock_px) = match hit {
            HitTarget::MiniGlobe => {
                self.touch = None;
                return;
            }
            HitTarget::Scrollable => (config.content_bias, config.content_lock_px),
            HitTarget::Other => (config.free_bias, config.free_lock_px),
        };
        self.touch = Some(Touch {
            start_x: x,
            start_y: y,
            bias,
            lock_px,
            axis: None,
            dx: 0.0,
        });
    }

    pub fn update(&mut self, x: f64, y: f64) -> SwipeUpdate {
        let Some(touch) = self.touch.as_mut() else {
            return SwipeUpdate::Idle;
        };
        let dx = x - touch.start_x;
        let dy = y - touch.start_y;

        if touch.axis.is_none() {
            if dx.abs() > touch.lock_px && dx.abs() * touch.bias > dy.abs() {
                touch.axis = Some(Axis::Horizontal);
            } else if dy.abs() > touch.lock_px {
                touch.axis = Some(Axis::Vertical);
            }
        }

        match touch.axis {
            Some(Axis::Horizontal) => {
                touch.dx = dx;
                SwipeUpdate::Dragging { dx_px: dx }
            }
            Some(Axis::Vertical) => SwipeUpdate::Scrolling,
            None => SwipeUpdate::Idle,
        }
    }

    pub fn end(&mut self, release_threshold_px: f64) -> SwipeOutcome {
        let Some(touch) = self.touch.take() else {
            return SwipeOutcome::None;
        };
        if touch.axis != Some(Axis::Horizontal) {
            return SwipeOutcome::None;
        }
        if touch.dx <= -release_threshold_px {
            SwipeOutcome::Next
        } else if touch.dx >= release_threshold_px {
            SwipeOutcome::Previous
        } else {
            SwipeOutcome::SnapBack
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.touch.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{HitTarget, SwipeOutcome, SwipeTracker, SwipeUpdate};
    use crate::config::PrismConfig;

    fn swipe(hit: HitTarget, path: &[(f64, f64)]) -> (Vec<SwipeUpdate>, SwipeOutcome) {
        let config = PrismConfig::default();
        let mut t = SwipeTracker::default();
        t.start(100.0, 100.0, hit, &config);
        let updates = path.iter().map(|&(x, y)| t.update(x, y)).collect();
        (updates, t.end(config.release_threshold_px))
    }

    #[test]
    fn free_area_locks_early_and_commits() {
        let (updates, outcome) = swipe(HitTarget::Other, &[(88.0, 102.0), (20.0, 110.0)]);
        assert_eq!(updates[0], SwipeUpdate::Dragging { dx_px: -12.0 });
        assert_eq!(outcome, SwipeOutcome::Next);

        let (_, outcome) = swipe(HitTarget::Other, &[(115.0, 100.0), (170.0, 100.0)]);
        assert_eq!(outcome, SwipeOutcome::Previous);
    }

    #[test]
    fn content_needs_a_deliberate_horizontal_swipe() {
        // 20px sideways is below the content lock distance.
        let (updates, _) = swipe(HitTarget::Scrollable, &[(80.0, 100.0)]);
        assert_eq!(updates[0], SwipeUpdate::Idle);

        // Diagonal drift: with bias 0.5 vertical wins.
        let (updates, outcome) = swipe(HitTarget::Scrollable, &[(60.0, 135.0), (0.0, 140.0)]);
        assert_eq!(updates[0], SwipeUpdate::Scrolling);
        assert_eq!(updates[1], SwipeUpdate::Scrolling);
        assert_eq!(outcome, SwipeOutcome::None);

        // The same diagonal outside content rotates.
        let (updates, _) = swipe(HitTarget::Other, &[(60.0, 135.0)]);
        assert_eq!(updates[0], SwipeUpdate::Dragging { dx_px: -40.0 });
    }

    #[test]
    fn short_drag_snaps_back() {
        let (_, outcome) = swipe(HitTarget::Other, &[(130.0, 100.0), (150.0, 100.0)]);
        assert_eq!(outcome, SwipeOutcome::SnapBack);
    }

    #[test]
    fn mini_globe_is_never_tracked() {
        let (updates, outcome) = swipe(HitTarget::MiniGlobe, &[(0.0, 100.0)]);
        assert_eq!(updates[0], SwipeUpdate::Idle);
        assert_eq!(outcome, SwipeOutcome::None);
    }
}

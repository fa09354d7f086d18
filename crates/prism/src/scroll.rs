use foundation::time::Time;
use tracing::debug;

/// Measured position of one feed card, in the same coordinate space as the
/// viewport center passed alongside it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CardGeometry {
    pub index: usize,
    pub center_px: f64,
}

/// Card whose center is nearest `viewport_center_px`, with its distance.
/// Ties go to the earlier card.
pub fn centered_card(cards: &[CardGeometry], viewport_center_px: f64) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for card in cards {
        let err = (card.center_px - viewport_center_px).abs();
        if !err.is_finite() {
            continue;
        }
        let better = match best {
            None => true,
            Some((index, best_err)) => err < best_err || (err == best_err && card.index < index),
        };
        if better {
            best = Some((card.index, err));
        }
    }
    best
}

/// What the scroll observer may do with an observation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LockVerdict {
    /// No programmatic navigation: follow the scroll.
    Free,
    /// Navigation in progress: ignore this observation.
    Suppressed,
    /// The target arrived; the lock is released.
    Converged(usize),
}

/// Guards a programmatic scroll against the scroll observer.
#[derive(Debug, Clone)]
pub struct NavigationLock {
    held: bool,
    target: Option<usize>,
    armed_at: Option<Time>,
    proximity_px: f64,
    timeout_ms: f64,
}

impl NavigationLock {
    pub fn new(proximity_px: f64, timeout_ms: f64) -> Self {
        Self {
            held: false,
            target: None,
            armed_at: None,
            proximity_px,
            timeout_ms,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Arms (or re-arms) the lock on `target`. Must precede the scroll.
    pub fn arm(&mut self, target: usize, now: Time) {
        self.held = true;
        self.target = Some(target);
        self.armed_at = Some(now);
    }

    fn release(&mut self) -> Option<usize> {
        self.held = false;
        self.armed_at = None;
        self.target.take()
    }

    pub fn observe(&mut self, centered: Option<(usize, f64)>) -> LockVerdict {
        if !self.held {
            return LockVerdict::Free;
        }
        match (self.target, centered) {
            (Some(target), Some((index, err))) if index == target && err < self.proximity_px => {
                self.release();
                LockVerdict::Converged(target)
            }
            _ => LockVerdict::Suppressed,
        }
    }

    /// Forced release once the timeout has elapsed. Returns the target the
    /// selection must settle on.
    pub fn poll(&mut self, now: Time) -> Option<usize> {
        let armed_at = self.armed_at?;
        if !self.held || now.since(armed_at) * 1000.0 < self.timeout_ms {
            return None;
        }
        debug!(target = ?self.target, "navigation lock released by timeout");
        self.release()
    }
}

use serde::{Deserialize, Serialize};

/// Carousel tuning.
///
/// Defaults are the values the page ships with; hosts may override any
/// subset from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismConfig {
    /// Viewport width (px) below which the phone layout is used.
    pub breakpoint_px: f64,
    /// Horizontal drag (px) needed on release to commit a rotation.
    pub release_threshold_px: f64,
    /// Horizontal weight when the gesture starts on scrollable content.
    pub content_bias: f64,
    /// Horizontal weight anywhere else.
    pub free_bias: f64,
    /// Movement (px) before an axis is chosen on scrollable content.
    pub content_lock_px: f64,
    /// Movement (px) before an axis is chosen anywhere else.
    pub free_lock_px: f64,
    /// Max distance (px) between card and viewport centers for a programmatic
    /// scroll to count as arrived.
    pub proximity_px: f64,
    /// Forced release of the navigation lock (ms).
    pub lock_timeout_ms: f64,
    /// Width of one prism face (px); a full-width drag turns one face.
    pub face_width_px: f64,
    /// Sources shown first in the comparison columns when present.
    pub preferred_sources: Vec<String>,
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 768.0,
            release_threshold_px: 60.0,
            content_bias: 0.5,
            free_bias: 1.0,
            content_lock_px: 30.0,
            free_lock_px: 10.0,
            proximity_px: 150.0,
            lock_timeout_ms: 1200.0,
            face_width_px: 360.0,
            preferred_sources: Vec::new(),
        }
    }
}

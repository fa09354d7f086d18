use foundation::math::zoom::ZoomBridge;
use serde::{Deserialize, Serialize};

use crate::state::GlobeId;

/// When a zoom-out on the tile map hands control back to the globe.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReturnPolicy {
    /// Zoom must have dropped at least `min_drop` levels below the entry zoom
    /// and be at or below `floor`.
    Hysteresis { min_drop: f64, floor: f64 },
    /// Any zoom at or below `zoom`.
    Threshold { zoom: f64 },
    /// Only an explicit double tap/click returns.
    GestureOnly,
}

impl ReturnPolicy {
    pub fn should_return(&self, zoom: f64, entry_zoom: f64) -> bool {
        match *self {
            ReturnPolicy::Hysteresis { min_drop, floor } => {
                entry_zoom - zoom >= min_drop && zoom <= floor
            }
            ReturnPolicy::Threshold { zoom: limit } => zoom <= limit,
            ReturnPolicy::GestureOnly => false,
        }
    }
}

/// Per-globe tuning of the hand-off.
///
/// Defaults describe the main globe; [`TransitionProfile::for_globe`] gives
/// the mini-globe variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionProfile {
    /// Altitude below which the tile layer is warmed up. `None` disables
    /// altitude-driven transitions.
    pub preload_altitude: Option<f64>,
    /// Altitude below which the hand-off starts on its own.
    pub transition_altitude: Option<f64>,
    /// Cross-fade duration (ms).
    pub fade_ms: f64,
    pub return_policy: ReturnPolicy,
    /// Lowest altitude the globe camera is placed at when returning.
    pub min_return_altitude: f64,
    /// Double-tap window (ms).
    pub double_tap_ms: f64,
    /// Whether a double click on the globe during preload enters the map.
    pub dblclick_in_preload: bool,
    pub bridge: ZoomBridge,
}

impl Default for TransitionProfile {
    fn default() -> Self {
        Self::main()
    }
}

impl TransitionProfile {
    pub fn main() -> Self {
        Self {
            preload_altitude: Some(2.5),
            transition_altitude: Some(0.8),
            fade_ms: 1000.0,
            return_policy: ReturnPolicy::Hysteresis {
                min_drop: 2.0,
                floor: 3.0,
            },
            min_return_altitude: 0.0,
            double_tap_ms: 300.0,
            dblclick_in_preload: true,
            bridge: ZoomBridge::default(),
        }
    }

    pub fn desktop() -> Self {
        Self {
            preload_altitude: Some(3.5),
            transition_altitude: Some(2.5),
            fade_ms: 1200.0,
            return_policy: ReturnPolicy::Threshold { zoom: 5.4 },
            ..Self::main()
        }
    }

    pub fn phone() -> Self {
        Self {
            preload_altitude: None,
            transition_altitude: None,
            fade_ms: 800.0,
            return_policy: ReturnPolicy::GestureOnly,
            min_return_altitude: 0.5,
            dblclick_in_preload: false,
            ..Self::main()
        }
    }

    pub fn for_globe(id: GlobeId) -> Self {
        match id {
            GlobeId::Main => Self::main(),
            GlobeId::Desktop => Self::desktop(),
            GlobeId::Phone => Self::phone(),
        }
    }
}

//! Bridge between the orbital camera's altitude metric and the tile pyramid's
//! zoom levels.
//!
//! The two engines use unrelated camera models. These conversions are the only
//! place the mapping lives; every hand-off between engines goes through them.

use serde::{Deserialize, Serialize};

/// Empirical correction so both engines show the same region at hand-off.
pub const ZOOM_CORRECTION: f64 = 0.6;
/// Tile-base constant of the pyramid.
pub const TILE_BASE: f64 = 128.0;
/// Lowest zoom the tile engine accepts.
pub const MIN_ZOOM: f64 = 2.0;
/// Highest zoom the tile engine accepts.
pub const MAX_ZOOM: f64 = 19.0;

/// Calibration of the altitude/zoom mapping.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomBridge {
    pub correction: f64,
    pub tile_base: f64,
}

impl Default for ZoomBridge {
    fn default() -> Self {
        Self {
            correction: ZOOM_CORRECTION,
            tile_base: TILE_BASE,
        }
    }
}

impl ZoomBridge {
    fn scale(&self) -> f64 {
        self.tile_base * self.correction
    }

    /// Orbital altitude to (unclamped) tile zoom.
    ///
    /// `altitude <= 0` or NaN is degenerate and maps to `MAX_ZOOM`; a
    /// non-positive ratio (e.g. infinite altitude) maps to `MIN_ZOOM`.
    pub fn altitude_to_zoom(&self, altitude: f64) -> f64 {
        if altitude.is_nan() || altitude <= 0.0 {
            return MAX_ZOOM;
        }
        let ratio = self.scale() / altitude;
        if ratio.is_nan() || ratio <= 0.0 {
            return MIN_ZOOM;
        }
        ratio.log2()
    }

    pub fn zoom_to_altitude(&self, zoom: f64) -> f64 {
        self.scale() / 2f64.powf(zoom)
    }

    /// Zoom ready to hand to the tile engine.
    pub fn altitude_to_tile_zoom(&self, altitude: f64) -> f64 {
        clamp_zoom(self.altitude_to_zoom(altitude))
    }
}

pub fn altitude_to_zoom(altitude: f64) -> f64 {
    ZoomBridge::default().altitude_to_zoom(altitude)
}

pub fn zoom_to_altitude(zoom: f64) -> f64 {
    ZoomBridge::default().zoom_to_altitude(zoom)
}

pub fn altitude_to_tile_zoom(altitude: f64) -> f64 {
    ZoomBridge::default().altitude_to_tile_zoom(altitude)
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return MAX_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Orbital altitude in globe radii above the surface, from the camera's
/// distance to the globe center. NaN when the camera can't be read.
pub fn altitude_from_camera(distance: f64, radius: f64) -> f64 {
    if !(radius > 0.0 && radius.is_finite() && distance.is_finite()) {
        return f64::NAN;
    }
    (distance / radius - 1.0).max(0.0)
}

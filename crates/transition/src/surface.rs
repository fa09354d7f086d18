use foundation::math::geodesy::{GeoPoint, ViewportState};
use foundation::math::zoom::altitude_from_camera;

use crate::markers::Marker;

/// Tile layer sits above the globe canvas while displayed.
pub const TILE_LAYER_Z: i32 = 5;
pub const ORBITAL_LAYER_Z: i32 = 0;

/// 3D globe engine (globe.gl-like camera contract).
pub trait OrbitalEngine {
    fn point_of_view(&self) -> ViewportState;
    fn set_point_of_view(&mut self, view: ViewportState, duration_ms: f64);
    fn camera_distance(&self) -> f64;
    fn globe_radius(&self) -> f64;
    fn set_auto_rotate(&mut self, enabled: bool);

    /// Altitude in globe radii derived from the camera position.
    fn altitude(&self) -> f64 {
        altitude_from_camera(self.camera_distance(), self.globe_radius())
    }
}

/// 2D slippy-map engine (Leaflet-like viewport contract).
pub trait TileEngine {
    fn set_view(&mut self, center: GeoPoint, zoom: f64, animate: bool);
    fn center(&self) -> GeoPoint;
    fn zoom(&self) -> f64;
    /// Re-measure the container after it became displayed.
    fn invalidate_size(&mut self);
    fn show_markers(&mut self, markers: &[Marker]);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Orbital,
    Tile,
}

/// Visibility of one DOM layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerStyle {
    pub displayed: bool,
    pub opacity: f64,
    pub pointer_events: bool,
    pub z_index: i32,
}

impl LayerStyle {
    pub fn orbital_active() -> Self {
        Self {
            displayed: true,
            opacity: 1.0,
            pointer_events: true,
            z_index: ORBITAL_LAYER_Z,
        }
    }

    pub fn tile_hidden() -> Self {
        Self {
            displayed: false,
            opacity: 0.0,
            pointer_events: false,
            z_index: TILE_LAYER_Z,
        }
    }
}

/// Applies layer styles to whatever hosts the two engines.
pub trait LayerHost {
    fn apply(&mut self, layer: Layer, style: &LayerStyle);
}

//! In-memory engines and layer host for controller tests.

use std::collections::BTreeMap;

use foundation::math::geodesy::{GeoPoint, ViewportState};

use crate::markers::Marker;
use crate::surface::{Layer, LayerHost, LayerStyle, OrbitalEngine, TileEngine};

pub const RADIUS: f64 = 100.0;

#[derive(Debug, Default)]
pub struct FakeGlobe {
    pub view: ViewportState,
    pub auto_rotate: bool,
    pub pov_calls: Vec<(ViewportState, f64)>,
    /// Camera reads fail and report NaN, like a globe whose scene is gone.
    pub unreadable: bool,
}

impl FakeGlobe {
    pub fn at(altitude: f64) -> Self {
        Self {
            view: ViewportState::new(GeoPoint::new(40.4, -3.7), altitude),
            auto_rotate: true,
            pov_calls: Vec::new(),
            unreadable: false,
        }
    }
}

impl OrbitalEngine for FakeGlobe {
    fn point_of_view(&self) -> ViewportState {
        self.view
    }

    fn set_point_of_view(&mut self, view: ViewportState, duration_ms: f64) {
        self.view = view;
        self.pov_calls.push((view, duration_ms));
    }

    fn camera_distance(&self) -> f64 {
        if self.unreadable {
            return f64::NAN;
        }
        RADIUS * (1.0 + self.view.altitude)
    }

    fn globe_radius(&self) -> f64 {
        if self.unreadable {
            return f64::NAN;
        }
        RADIUS
    }

    fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }
}

#[derive(Debug, Default)]
pub struct FakeMap {
    pub center: GeoPoint,
    pub zoom: f64,
    pub views: Vec<(GeoPoint, f64, bool)>,
    pub invalidations: usize,
    pub markers: Vec<Marker>,
}

impl TileEngine for FakeMap {
    fn set_view(&mut self, center: GeoPoint, zoom: f64, animate: bool) {
        self.center = center;
        self.zoom = zoom;
        self.views.push((center, zoom, animate));
    }

    fn center(&self) -> GeoPoint {
        self.center
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn invalidate_size(&mut self) {
        self.invalidations += 1;
    }

    fn show_markers(&mut self, markers: &[Marker]) {
        self.markers = markers.to_vec();
    }
}

/// Records every style change and counts moments where both layers were
/// interactive at once.
#[derive(Debug, Default)]
pub struct RecordingLayers {
    pub current: BTreeMap<Layer, LayerStyle>,
    pub applied: usize,
    pub both_interactive: usize,
}

impl RecordingLayers {
    pub fn style(&self, layer: Layer) -> LayerStyle {
        self.current
            .get(&layer)
            .copied()
            .unwrap_or_else(LayerStyle::tile_hidden)
    }
}

impl LayerHost for RecordingLayers {
    fn apply(&mut self, layer: Layer, style: &LayerStyle) {
        self.current.insert(layer, *style);
        self.applied += 1;
        let interactive = self.current.values().filter(|s| s.pointer_events).count();
        if interactive > 1 {
            self.both_interactive += 1;
        }
    }
}

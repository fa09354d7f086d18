use foundation::math::geodesy::ViewportState;
use foundation::time::Time;
use runtime::event_bus::{Event, EventBus};
use runtime::tween::Tween;
use serde::Serialize;
use streaming::protocol::NewsItem;
use tracing::{debug, info};

use crate::markers::{Marker, group_markers};
use crate::profile::TransitionProfile;
use crate::state::{Direction, EngineState, GlobeId};
use crate::surface::{Layer, LayerHost, LayerStyle, OrbitalEngine, TileEngine};
use crate::tap::DoubleTapDetector;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    StateChanged { from: EngineState, to: EngineState },
    FadeStarted { direction: Direction },
}

#[derive(Debug, Copy, Clone)]
enum Phase {
    /// Tile layer was just displayed; sizing and camera sync wait one frame.
    AwaitingLayout,
    Fading(Tween),
}

#[derive(Debug, Copy, Clone)]
struct InFlight {
    direction: Direction,
    phase: Phase,
}

/// State machine driving one globe's orbital/tile hand-off.
pub struct TransitionController<O, T, H> {
    id: GlobeId,
    profile: TransitionProfile,
    orbital: Option<O>,
    tile: Option<T>,
    layers: H,
    state: EngineState,
    in_flight: Option<InFlight>,
    entry_zoom: Option<f64>,
    /// Cleared by a return; set again once the camera climbs back above the
    /// preload altitude.
    altitude_armed: bool,
    markers: Vec<Marker>,
    orbital_taps: DoubleTapDetector,
    tile_taps: DoubleTapDetector,
    orbital_style: LayerStyle,
    tile_style: LayerStyle,
    events: EventBus<EngineEvent>,
    missing_logged: bool,
}

impl<O: OrbitalEngine, T: TileEngine, H: LayerHost> TransitionController<O, T, H> {
    pub fn new(id: GlobeId, profile: TransitionProfile, layers: H) -> Self {
        let mut ctl = Self {
            id,
            orbital_taps: DoubleTapDetector::new(profile.double_tap_ms),
            tile_taps: DoubleTapDetector::new(profile.double_tap_ms),
            profile,
            orbital: None,
            tile: None,
            layers,
            state: EngineState::Orbital,
            in_flight: None,
            entry_zoom: None,
            altitude_armed: true,
            markers: Vec::new(),
            orbital_style: LayerStyle::orbital_active(),
            tile_style: LayerStyle::tile_hidden(),
            events: EventBus::new(),
            missing_logged: false,
        };
        ctl.layers.apply(Layer::Tile, &ctl.tile_style);
        ctl.layers.apply(Layer::Orbital, &ctl.orbital_style);
        ctl
    }

    pub fn id(&self) -> GlobeId {
        self.id
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn profile(&self) -> &TransitionProfile {
        &self.profile
    }

    /// Replaces the tuning; ignored while a transition is running.
    pub fn set_profile(&mut self, profile: TransitionProfile) {
        if self.transition_in_progress() {
            debug!(globe = self.id.as_str(), "profile change ignored during transition");
            return;
        }
        self.orbital_taps = DoubleTapDetector::new(profile.double_tap_ms);
        self.tile_taps = DoubleTapDetector::new(profile.double_tap_ms);
        self.profile = profile;
    }

    pub fn transition_in_progress(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn entry_zoom(&self) -> Option<f64> {
        self.entry_zoom
    }

    pub fn events(&self) -> &EventBus<EngineEvent> {
        &self.events
    }

    /// Hands the recorded events to the caller and empties the log.
    pub fn drain_events(&mut self) -> Vec<Event<EngineEvent>> {
        self.events.drain()
    }

    pub fn layers(&self) -> &H {
        &self.layers
    }

    pub fn orbital(&self) -> Option<&O> {
        self.orbital.as_ref()
    }

    pub fn orbital_mut(&mut self) -> Option<&mut O> {
        self.orbital.as_mut()
    }

    pub fn tile(&self) -> Option<&T> {
        self.tile.as_ref()
    }

    pub fn tile_mut(&mut self) -> Option<&mut T> {
        self.tile.as_mut()
    }

    pub fn style(&self, layer: Layer) -> LayerStyle {
        match layer {
            Layer::Orbital => self.orbital_style,
            Layer::Tile => self.tile_style,
        }
    }

    /// Binds the globe engine. A second attach is ignored: engines live for
    /// the whole page session.
    pub fn attach_orbital(&mut self, engine: O) -> bool {
        if self.orbital.is_some() {
            debug!(globe = self.id.as_str(), "orbital engine already attached");
            return false;
        }
        self.orbital = Some(engine);
        true
    }

    pub fn attach_tile(&mut self, engine: T) -> bool {
        if self.tile.is_some() {
            debug!(globe = self.id.as_str(), "tile engine already attached");
            return false;
        }
        self.tile = Some(engine);
        true
    }

    /// Replaces the marker dataset; pushed right away if the map is visible.
    pub fn set_news(&mut self, news: &[NewsItem]) {
        self.markers = group_markers(news);
        if self.tile_style.displayed {
            if let Some(tile) = self.tile.as_mut() {
                tile.show_markers(&self.markers);
            }
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    fn engines_ready(&mut self) -> bool {
        if self.orbital.is_some() && self.tile.is_some() {
            return true;
        }
        if !self.missing_logged {
            debug!(globe = self.id.as_str(), "engine not attached; request ignored");
            self.missing_logged = true;
        }
        false
    }

    fn set_state(&mut self, to: EngineState, now: Time) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!(globe = self.id.as_str(), from = from.as_str(), to = to.as_str(), "engine state");
        self.events.emit(now, EngineEvent::StateChanged { from, to });
    }

    fn style_orbital(&mut self, f: impl FnOnce(&mut LayerStyle)) {
        f(&mut self.orbital_style);
        self.layers.apply(Layer::Orbital, &self.orbital_style);
    }

    fn style_tile(&mut self, f: impl FnOnce(&mut LayerStyle)) {
        f(&mut self.tile_style);
        self.layers.apply(Layer::Tile, &self.tile_style);
    }

    /// Points the tile map where the globe camera looks.
    fn sync_tile_camera(&mut self) {
        let (Some(orbital), Some(tile)) = (self.orbital.as_ref(), self.tile.as_mut()) else {
            return;
        };
        let view = orbital.point_of_view();
        let zoom = self.profile.bridge.altitude_to_tile_zoom(view.altitude);
        tile.set_view(view.center, zoom, false);
    }

    fn show_tile_layer_hidden(&mut self) {
        self.style_tile(|s| {
            s.displayed = true;
            s.opacity = 0.0;
            s.pointer_events = false;
        });
    }

    /// Per-frame altitude check driving preload and automatic hand-off.
    pub fn check_altitude(&mut self, now: Time) {
        if self.transition_in_progress() || !self.engines_ready() {
            return;
        }
        let Some(preload) = self.profile.preload_altitude else {
            return;
        };
        let Some(altitude) = self.orbital.as_ref().map(|o| o.altitude()) else {
            return;
        };
        if !altitude.is_finite() {
            debug!(globe = self.id.as_str(), "camera unreadable; altitude check skipped");
            return;
        }
        if !self.altitude_armed {
            if altitude >= preload {
                debug!(globe = self.id.as_str(), altitude, "altitude check re-armed");
                self.altitude_armed = true;
            }
            return;
        }
        let enter_at = self.profile.transition_altitude;

        match self.state {
            EngineState::Orbital => {
                if altitude < preload {
                    self.enter_preload(now);
                }
            }
            EngineState::Preload => {
                if altitude >= preload {
                    self.abort_preload(now);
                } else if enter_at.is_some_and(|t| altitude < t) {
                    self.enter_local(now);
                } else {
                    self.sync_tile_camera();
                }
            }
            EngineState::Transitioning | EngineState::Local => {}
        }
    }

    fn enter_preload(&mut self, now: Time) {
        self.show_tile_layer_hidden();
        if let Some(tile) = self.tile.as_mut() {
            tile.invalidate_size();
        }
        self.sync_tile_camera();
        if let Some(tile) = self.tile.as_mut() {
            tile.show_markers(&self.markers);
        }
        self.set_state(EngineState::Preload, now);
    }

    fn abort_preload(&mut self, now: Time) {
        self.style_tile(|s| *s = LayerStyle::tile_hidden());
        self.set_state(EngineState::Orbital, now);
    }

    /// Starts the hand-off to the tile map. Returns false if rejected.
    pub fn enter_local(&mut self, now: Time) -> bool {
        if self.transition_in_progress() {
            debug!(globe = self.id.as_str(), "enter_local ignored: transition in progress");
            return false;
        }
        if self.state == EngineState::Local || !self.engines_ready() {
            return false;
        }
        if let Some(orbital) = self.orbital.as_mut() {
            orbital.set_auto_rotate(false);
        }
        self.style_orbital(|s| s.pointer_events = false);
        self.show_tile_layer_hidden();
        self.in_flight = Some(InFlight {
            direction: Direction::ToLocal,
            phase: Phase::AwaitingLayout,
        });
        self.set_state(EngineState::Transitioning, now);
        true
    }

    /// Starts the hand-off back to the globe. Only valid from `Local`.
    pub fn return_to_orbital(&mut self, now: Time) -> bool {
        if self.transition_in_progress() {
            debug!(globe = self.id.as_str(), "return ignored: transition in progress");
            return false;
        }
        if self.state != EngineState::Local || !self.engines_ready() {
            return false;
        }
        self.style_tile(|s| s.pointer_events = false);
        self.style_orbital(|s| {
            s.displayed = true;
            s.opacity = 0.0;
            s.pointer_events = false;
        });

        let min_altitude = self.profile.min_return_altitude;
        let bridge = self.profile.bridge;
        if let (Some(orbital), Some(tile)) = (self.orbital.as_mut(), self.tile.as_ref()) {
            let altitude = bridge.zoom_to_altitude(tile.zoom()).max(min_altitude);
            orbital.set_point_of_view(ViewportState::new(tile.center(), altitude), 0.0);
        }

        self.in_flight = Some(InFlight {
            direction: Direction::ToOrbital,
            phase: Phase::Fading(Tween::new(now, self.profile.fade_ms, 0.0, 1.0)),
        });
        self.set_state(EngineState::Transitioning, now);
        self.events.emit(
            now,
            EngineEvent::FadeStarted {
                direction: Direction::ToOrbital,
            },
        );
        true
    }

    pub fn on_orbital_double_click(&mut self, now: Time) -> bool {
        let allowed = match self.state {
            EngineState::Orbital => true,
            EngineState::Preload => self.profile.dblclick_in_preload,
            EngineState::Transitioning | EngineState::Local => false,
        };
        if !allowed {
            debug!(globe = self.id.as_str(), state = self.state.as_str(), "globe double click ignored");
            return false;
        }
        self.enter_local(now)
    }

    pub fn on_tile_double_click(&mut self, now: Time) -> bool {
        if self.state != EngineState::Local {
            debug!(globe = self.id.as_str(), state = self.state.as_str(), "map double click ignored");
            return false;
        }
        self.return_to_orbital(now)
    }

    /// Touch-end on the globe; a second tap within the window acts as a
    /// double click.
    pub fn on_orbital_tap(&mut self, now: Time) -> bool {
        if self.orbital_taps.register(now) {
            return self.on_orbital_double_click(now);
        }
        false
    }

    pub fn on_tile_tap(&mut self, now: Time) -> bool {
        if self.tile_taps.register(now) {
            return self.on_tile_double_click(now);
        }
        false
    }

    /// Map zoom gesture finished: apply the profile's return policy.
    pub fn on_tile_zoom_end(&mut self, now: Time) -> bool {
        if self.state != EngineState::Local {
            return false;
        }
        let (Some(tile), Some(entry)) = (self.tile.as_ref(), self.entry_zoom) else {
            return false;
        };
        let zoom = tile.zoom();
        if !self.profile.return_policy.should_return(zoom, entry) {
            debug!(globe = self.id.as_str(), zoom, entry, "zoom end below return policy");
            return false;
        }
        self.return_to_orbital(now)
    }

    /// Advances the running cross-fade. Returns true while animating.
    pub fn tick(&mut self, now: Time) -> bool {
        let Some(flight) = self.in_flight else {
            return false;
        };
        match flight.phase {
            Phase::AwaitingLayout => {
                self.begin_local_fade(now);
                true
            }
            Phase::Fading(tween) => {
                let p = tween.value(now);
                self.apply_fade(flight.direction, p);
                if tween.is_finished(now) {
                    self.finish(flight.direction, now);
                    false
                } else {
                    true
                }
            }
        }
    }

    fn begin_local_fade(&mut self, now: Time) {
        if let Some(tile) = self.tile.as_mut() {
            tile.invalidate_size();
        }
        self.sync_tile_camera();
        if let Some(tile) = self.tile.as_mut() {
            tile.show_markers(&self.markers);
            self.entry_zoom = Some(tile.zoom());
        }
        self.in_flight = Some(InFlight {
            direction: Direction::ToLocal,
            phase: Phase::Fading(Tween::new(now, self.profile.fade_ms, 0.0, 1.0)),
        });
        self.events.emit(
            now,
            EngineEvent::FadeStarted {
                direction: Direction::ToLocal,
            },
        );
    }

    fn apply_fade(&mut self, direction: Direction, p: f64) {
        let (orbital, tile) = match direction {
            Direction::ToLocal => (1.0 - p, p),
            Direction::ToOrbital => (p, 1.0 - p),
        };
        self.style_orbital(|s| s.opacity = orbital);
        self.style_tile(|s| s.opacity = tile);
    }

    fn finish(&mut self, direction: Direction, now: Time) {
        self.in_flight = None;
        match direction {
            Direction::ToLocal => {
                self.style_orbital(|s| {
                    s.displayed = false;
                    s.opacity = 0.0;
                    s.pointer_events = false;
                });
                self.style_tile(|s| {
                    s.opacity = 1.0;
                    s.pointer_events = true;
                });
                self.set_state(EngineState::Local, now);
            }
            Direction::ToOrbital => {
                self.style_tile(|s| *s = LayerStyle::tile_hidden());
                self.style_orbital(|s| *s = LayerStyle::orbital_active());
                self.entry_zoom = None;
                self.altitude_armed = false;
                self.set_state(EngineState::Orbital, now);
            }
        }
        self.orbital_taps.reset();
        self.tile_taps.reset();
    }
}

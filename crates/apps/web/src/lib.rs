use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use foundation::ids::{FaceId, HechoId};
use foundation::time::Time;
use prism::{HitTarget, LayoutMode, PrismConfig, PrismController};
use runtime::event_bus::Event;
use runtime::frame::FrameClock;
use streaming::protocol::{Endpoint, FetchPayload, NewsItem};
use streaming::sync::FetchCommand;
use tracing::{debug, info, warn};
use transition::{EngineEvent, GlobeId, TransitionController, TransitionProfile};

mod engines;
mod fetch;
mod markup;
mod prism_view;

use engines::{DomLayers, GlobeGl, LeafletMap};
use prism_view::DomPrismView;

// Guard to prevent double-initialization of global state (relevant during hot reload).
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

type WebGlobe = TransitionController<GlobeGl, LeafletMap, DomLayers>;

#[derive(Default)]
struct HostState {
    /// Prefix for every API path; empty means same origin.
    api_base: String,
    clock: FrameClock,
    globes: BTreeMap<GlobeId, WebGlobe>,
    /// Profile overrides set before the globe was initialized.
    profiles: BTreeMap<GlobeId, TransitionProfile>,
    prism: Option<PrismController<DomPrismView>>,
    prism_config: PrismConfig,
    news: Vec<NewsItem>,
    /// Bumped on every news request; older responses are dropped.
    news_generation: u64,
}

thread_local! {
    static STATE: RefCell<HostState> = RefCell::new(HostState::default());
}

/// Safe TLS access helper that returns a default on teardown instead of panicking.
fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&RefCell<HostState>) -> R,
    R: Default,
{
    STATE.try_with(f).unwrap_or_default()
}

fn with_prism<F, R>(f: F) -> R
where
    F: FnOnce(&mut PrismController<DomPrismView>) -> R,
    R: Default,
{
    with_state(|state| state.borrow_mut().prism.as_mut().map(f).unwrap_or_default())
}

fn with_globe<F, R>(id: &str, f: F) -> R
where
    F: FnOnce(&mut WebGlobe) -> R,
    R: Default,
{
    let Some(id) = GlobeId::parse(id) else {
        debug!(id, "unknown globe id");
        return R::default();
    };
    with_state(|state| state.borrow_mut().globes.get_mut(&id).map(f).unwrap_or_default())
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    });
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Applies the keys present in `patch` on top of `current`.
fn merge_json<T>(current: &T, patch: &str) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut base = serde_json::to_value(current)?;
    let patch: serde_json::Value = serde_json::from_str(patch)?;
    if let (Some(base), serde_json::Value::Object(patch)) = (base.as_object_mut(), patch) {
        base.extend(patch);
    }
    serde_json::from_value(base)
}

fn layout_for_width(width_px: f64, config: &PrismConfig) -> LayoutMode {
    LayoutMode::for_width(width_px, config.breakpoint_px)
}

fn hit_target(s: &str) -> HitTarget {
    match s {
        "scrollable" | "content" => HitTarget::Scrollable,
        "mini_globe" | "globe" => HitTarget::MiniGlobe,
        _ => HitTarget::Other,
    }
}

/// Runs each fetch and feeds its result back into the prism controller.
fn dispatch(commands: Vec<FetchCommand>) {
    if commands.is_empty() {
        return;
    }
    let base = with_state(|state| state.borrow().api_base.clone());
    for cmd in commands {
        let base = base.clone();
        spawn_local(async move {
            let result = fetch::fetch_payload(&base, &cmd.endpoint)
                .await
                .map_err(|e| e.to_string());
            let next = with_prism(|p| p.on_fetch_complete(cmd.ticket, result));
            dispatch(next);
        });
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Avoid double-initialization (can happen during hot-reload edge cases).
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_panic_hook();
    info!("news globe host started");
    Ok(())
}

#[wasm_bindgen]
pub fn set_api_base(base: &str) {
    with_state(|state| state.borrow_mut().api_base = base.trim_end_matches('/').to_string());
}

/// Binds a globe.gl instance, a Leaflet map and their two layer containers
/// to the controller of globe `id`. Engines already bound stay bound.
#[wasm_bindgen]
pub fn init_globe(
    id: &str,
    globe: JsValue,
    map: JsValue,
    orbital_layer_id: &str,
    tile_layer_id: &str,
) -> Result<(), JsValue> {
    let globe_id = GlobeId::parse(id).ok_or_else(|| JsValue::from_str(&format!("unknown globe {id}")))?;
    let layers = DomLayers::from_ids(orbital_layer_id, tile_layer_id)?;

    with_state(|state| {
        let mut s = state.borrow_mut();
        let s = &mut *s;
        let profile = s
            .profiles
            .get(&globe_id)
            .cloned()
            .unwrap_or_else(|| TransitionProfile::for_globe(globe_id));
        let ctl = s
            .globes
            .entry(globe_id)
            .or_insert_with(|| TransitionController::new(globe_id, profile, layers));
        ctl.attach_orbital(GlobeGl::new(globe));
        ctl.attach_tile(LeafletMap::new(map));
        ctl.set_news(&s.news);
    });
    info!(globe = id, "globe bound");
    Ok(())
}

/// Per-frame driver, called from `requestAnimationFrame`.
#[wasm_bindgen]
pub fn frame(timestamp_ms: f64) {
    let commands = with_state(|state| {
        let mut s = state.borrow_mut();
        let now = s.clock.advance(timestamp_ms).time;
        for ctl in s.globes.values_mut() {
            ctl.check_altitude(now);
            ctl.tick(now);
        }
        s.prism.as_mut().map(|p| p.tick(now)).unwrap_or_default()
    });
    dispatch(commands);
}

#[wasm_bindgen]
pub fn globe_double_click(id: &str, timestamp_ms: f64) -> bool {
    with_globe(id, |c| c.on_orbital_double_click(Time::from_ms(timestamp_ms)))
}

#[wasm_bindgen]
pub fn globe_tap(id: &str, timestamp_ms: f64) -> bool {
    with_globe(id, |c| c.on_orbital_tap(Time::from_ms(timestamp_ms)))
}

#[wasm_bindgen]
pub fn map_double_click(id: &str, timestamp_ms: f64) -> bool {
    with_globe(id, |c| c.on_tile_double_click(Time::from_ms(timestamp_ms)))
}

#[wasm_bindgen]
pub fn map_tap(id: &str, timestamp_ms: f64) -> bool {
    with_globe(id, |c| c.on_tile_tap(Time::from_ms(timestamp_ms)))
}

#[wasm_bindgen]
pub fn map_zoom_end(id: &str, timestamp_ms: f64) -> bool {
    with_globe(id, |c| c.on_tile_zoom_end(Time::from_ms(timestamp_ms)))
}

#[wasm_bindgen]
pub fn globe_state(id: &str) -> String {
    with_globe(id, |c| c.state().as_str().to_string())
}

#[derive(Serialize)]
struct EventJson {
    time_ms: f64,
    #[serde(flatten)]
    event: EngineEvent,
}

fn events_json(events: &[Event<EngineEvent>]) -> Result<String, serde_json::Error> {
    let rows: Vec<EventJson> = events
        .iter()
        .map(|e| EventJson {
            time_ms: e.time.as_ms(),
            event: e.kind,
        })
        .collect();
    serde_json::to_string(&rows)
}

/// State changes and fades of globe `id` since the last call, as a JSON
/// array. Reading empties the log.
#[wasm_bindgen]
pub fn globe_events(id: &str) -> Result<String, JsValue> {
    let events = with_globe(id, |c| c.drain_events());
    events_json(&events).map_err(js_err)
}

/// Overrides profile fields of globe `id` from a JSON object.
#[wasm_bindgen]
pub fn configure_globe(id: &str, json: &str) -> Result<(), JsValue> {
    let globe_id = GlobeId::parse(id).ok_or_else(|| JsValue::from_str(&format!("unknown globe {id}")))?;
    let applied = with_state(|state| {
        let mut s = state.borrow_mut();
        let current = match s.globes.get(&globe_id) {
            Some(ctl) => ctl.profile().clone(),
            None => s
                .profiles
                .get(&globe_id)
                .cloned()
                .unwrap_or_else(|| TransitionProfile::for_globe(globe_id)),
        };
        let profile = match merge_json(&current, json) {
            Ok(profile) => profile,
            Err(err) => return Some(Err(js_err(err))),
        };
        if let Some(ctl) = s.globes.get_mut(&globe_id) {
            ctl.set_profile(profile.clone());
        }
        info!(globe = id, "globe profile updated");
        s.profiles.insert(globe_id, profile);
        Some(Ok(()))
    });
    applied.unwrap_or_else(|| Err(JsValue::from_str("host state unavailable")))
}

#[wasm_bindgen]
pub fn get_globe_config(id: &str) -> Result<String, JsValue> {
    let globe_id = GlobeId::parse(id).ok_or_else(|| JsValue::from_str(&format!("unknown globe {id}")))?;
    let profile = with_state(|state| {
        let s = state.borrow();
        s.globes
            .get(&globe_id)
            .map(|c| c.profile().clone())
            .or_else(|| s.profiles.get(&globe_id).cloned())
    })
    .unwrap_or_else(|| TransitionProfile::for_globe(globe_id));
    serde_json::to_string(&profile).map_err(js_err)
}

#[wasm_bindgen]
pub fn configure_prism(json: &str) -> Result<(), JsValue> {
    let applied = with_state(|state| {
        let mut s = state.borrow_mut();
        let config = match merge_json(&s.prism_config, json) {
            Ok(config) => config,
            Err(err) => return Some(Err(js_err(err))),
        };
        if let Some(p) = s.prism.as_mut() {
            p.set_config(config.clone());
        }
        s.prism_config = config;
        Some(Ok(()))
    });
    applied.unwrap_or_else(|| Err(JsValue::from_str("host state unavailable")))
}

#[wasm_bindgen]
pub fn get_prism_config() -> Result<String, JsValue> {
    let config = with_state(|state| state.borrow().prism_config.clone());
    serde_json::to_string(&config).map_err(js_err)
}

/// Fetch and render counters of the prism's sync layer, as JSON.
#[wasm_bindgen]
pub fn get_sync_metrics() -> Result<String, JsValue> {
    let snapshot = with_prism(|p| p.sync().metrics().snapshot());
    serde_json::to_string(&snapshot).map_err(js_err)
}

/// Binds the prism markup and requests the seed hechos.
#[wasm_bindgen]
pub fn init_prism(viewport_width_px: f64) -> Result<(), JsValue> {
    let view = DomPrismView::from_document()?;
    let commands = with_state(|state| {
        let mut s = state.borrow_mut();
        if s.prism.is_some() {
            return Vec::new();
        }
        let config = s.prism_config.clone();
        let layout = layout_for_width(viewport_width_px, &config);
        let mut ctl = PrismController::new(config, layout, view);
        let commands = ctl.load_seed();
        s.prism = Some(ctl);
        commands
    });
    dispatch(commands);
    Ok(())
}

#[wasm_bindgen]
pub fn load_recent_hechos() {
    dispatch(with_prism(|p| p.load_seed()));
}

#[wasm_bindgen]
pub fn prism_rotate_to(face: &str) {
    let Some(face) = FaceId::parse(face) else {
        debug!(face, "unknown face");
        return;
    };
    dispatch(with_prism(|p| p.rotate_to(face)));
}

#[wasm_bindgen]
pub fn prism_rotate_left() {
    dispatch(with_prism(|p| p.rotate_left()));
}

#[wasm_bindgen]
pub fn prism_rotate_right() {
    dispatch(with_prism(|p| p.rotate_right()));
}

#[wasm_bindgen]
pub fn prism_touch_start(x: f64, y: f64, hit: &str) {
    with_prism(|p| p.touch_start(x, y, hit_target(hit)));
}

/// Returns true when the prism owns the move and native scrolling should be
/// cancelled.
#[wasm_bindgen]
pub fn prism_touch_move(x: f64, y: f64) -> bool {
    with_prism(|p| p.touch_move(x, y))
}

#[wasm_bindgen]
pub fn prism_touch_end() {
    dispatch(with_prism(|p| p.touch_end()));
}

/// Scroll observer for the events feed.
#[wasm_bindgen]
pub fn prism_feed_scrolled() {
    dispatch(with_prism(|p| {
        let (cards, center) = p.view().card_geometry();
        p.on_feed_scroll(&cards, center)
    }));
}

#[wasm_bindgen]
pub fn prism_select_timeline(id: &str, timestamp_ms: f64) {
    let id = HechoId::from(id);
    dispatch(with_prism(|p| p.select_from_timeline(&id, Time::from_ms(timestamp_ms))));
}

#[wasm_bindgen]
pub fn prism_navigate_to(id: &str, timestamp_ms: f64) {
    let id = HechoId::from(id);
    dispatch(with_prism(|p| p.navigate_to_hecho(&id, Time::from_ms(timestamp_ms))));
}

/// Explicit layout toggle: "phone", "desktop" or "fullscreen_globe".
#[wasm_bindgen]
pub fn set_layout_mode(mode: &str) -> Result<(), JsValue> {
    let mode = LayoutMode::parse(mode).ok_or_else(|| JsValue::from_str(&format!("unknown layout {mode}")))?;
    dispatch(with_prism(|p| p.set_layout(mode)));
    Ok(())
}

#[wasm_bindgen]
pub fn viewport_resized(width_px: f64) {
    dispatch(with_prism(|p| p.on_viewport_resize(width_px)));
}

/// Loads geolocated news for the map markers of every globe.
#[wasm_bindgen]
pub fn load_news(date: Option<String>, topic: Option<String>) {
    let endpoint = Endpoint::News { date, topic };
    let (base, generation) = with_state(|state| {
        let mut s = state.borrow_mut();
        s.news_generation += 1;
        (s.api_base.clone(), s.news_generation)
    });
    spawn_local(async move {
        let news = match fetch::fetch_payload(&base, &endpoint).await {
            Ok(FetchPayload::News(news)) => news,
            Ok(other) => {
                warn!(len = other.len(), "news endpoint returned another payload");
                return;
            }
            Err(err) => {
                warn!(%err, "news not loaded");
                return;
            }
        };
        with_state(|state| {
            let mut s = state.borrow_mut();
            if s.news_generation != generation {
                debug!(generation, "stale news response dropped");
                return;
            }
            info!(count = news.len(), "news loaded");
            for ctl in s.globes.values_mut() {
                ctl.set_news(&news);
            }
            s.news = news;
        });
    });
}

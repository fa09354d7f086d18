//! globe.gl / Leaflet handles and the two DOM layers behind the engine traits.

use foundation::math::geodesy::{GeoPoint, ViewportState};
use serde::Serialize;
use tracing::debug;
use transition::{Layer, LayerHost, LayerStyle, Marker, OrbitalEngine, TileEngine};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[wasm_bindgen(inline_js = "
export function news_globe_pov(globe, field) {
    const p = globe.pointOfView();
    return p[field];
}

export function news_globe_set_pov(globe, lat, lng, altitude, ms) {
    globe.pointOfView({ lat, lng, altitude }, ms);
}

export function news_globe_camera_distance(globe) {
    return globe.camera().position.length();
}

export function news_globe_radius(globe) {
    return typeof globe.getGlobeRadius === 'function' ? globe.getGlobeRadius() : 100;
}

export function news_globe_set_auto_rotate(globe, on) {
    const controls = globe.controls();
    if (controls) controls.autoRotate = on;
}

export function news_map_set_view(map, lat, lng, zoom, animate) {
    map.setView([lat, lng], zoom, { animate });
}

export function news_map_center(map, field) {
    return map.getCenter()[field];
}

export function news_map_zoom(map) {
    return map.getZoom();
}

export function news_map_invalidate_size(map) {
    map.invalidateSize();
}

export function news_map_show_markers(map, json) {
    if (map.__newsMarkers) map.__newsMarkers.remove();
    const group = L.layerGroup();
    for (const m of JSON.parse(json)) {
        const popup = document.createElement('div');
        const city = document.createElement('b');
        city.textContent = m.count > 1 ? m.city + ' (' + m.count + ')' : m.city;
        popup.appendChild(city);
        for (const t of m.titles) {
            const line = document.createElement('div');
            line.textContent = t;
            popup.appendChild(line);
        }
        L.marker([m.lat, m.lng]).bindPopup(popup).addTo(group);
    }
    group.addTo(map);
    map.__newsMarkers = group;
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn news_globe_pov(globe: &JsValue, field: &str) -> Result<f64, JsValue>;

    #[wasm_bindgen(catch)]
    fn news_globe_set_pov(
        globe: &JsValue,
        lat: f64,
        lng: f64,
        altitude: f64,
        ms: f64,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn news_globe_camera_distance(globe: &JsValue) -> Result<f64, JsValue>;

    #[wasm_bindgen(catch)]
    fn news_globe_radius(globe: &JsValue) -> Result<f64, JsValue>;

    #[wasm_bindgen(catch)]
    fn news_globe_set_auto_rotate(globe: &JsValue, on: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn news_map_set_view(
        map: &JsValue,
        lat: f64,
        lng: f64,
        zoom: f64,
        animate: bool,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn news_map_center(map: &JsValue, field: &str) -> Result<f64, JsValue>;

    #[wasm_bindgen(catch)]
    fn news_map_zoom(map: &JsValue) -> Result<f64, JsValue>;

    #[wasm_bindgen(catch)]
    fn news_map_invalidate_size(map: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn news_map_show_markers(map: &JsValue, json: &str) -> Result<(), JsValue>;
}

fn or_log<T>(op: &str, r: Result<T, JsValue>, fallback: T) -> T {
    r.unwrap_or_else(|err| {
        debug!(op, ?err, "engine call failed");
        fallback
    })
}

/// globe.gl instance.
pub struct GlobeGl {
    handle: JsValue,
}

impl GlobeGl {
    pub fn new(handle: JsValue) -> Self {
        Self { handle }
    }
}

impl OrbitalEngine for GlobeGl {
    fn point_of_view(&self) -> ViewportState {
        let lat = or_log("pov.lat", news_globe_pov(&self.handle, "lat"), 0.0);
        let lng = or_log("pov.lng", news_globe_pov(&self.handle, "lng"), 0.0);
        let altitude = or_log("pov.altitude", news_globe_pov(&self.handle, "altitude"), 0.0);
        ViewportState::new(GeoPoint::new(lat, lng), altitude)
    }

    fn set_point_of_view(&mut self, view: ViewportState, duration_ms: f64) {
        let r = news_globe_set_pov(
            &self.handle,
            view.center.lat_deg,
            view.center.lng_deg,
            view.altitude,
            duration_ms,
        );
        or_log("set_pov", r, ());
    }

    fn camera_distance(&self) -> f64 {
        or_log("camera_distance", news_globe_camera_distance(&self.handle), f64::NAN)
    }

    fn globe_radius(&self) -> f64 {
        or_log("globe_radius", news_globe_radius(&self.handle), f64::NAN)
    }

    fn set_auto_rotate(&mut self, enabled: bool) {
        or_log("auto_rotate", news_globe_set_auto_rotate(&self.handle, enabled), ());
    }
}

#[derive(Serialize)]
struct MarkerJson<'a> {
    lat: f64,
    lng: f64,
    city: &'a str,
    titles: &'a [String],
    count: usize,
}

pub(crate) fn markers_json(markers: &[Marker]) -> String {
    let rows: Vec<MarkerJson<'_>> = markers
        .iter()
        .map(|m| MarkerJson {
            lat: m.position.lat_deg,
            lng: m.position.lng_deg,
            city: &m.city,
            titles: &m.titles,
            count: m.count,
        })
        .collect();
    serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
}

/// Leaflet map instance.
pub struct LeafletMap {
    handle: JsValue,
}

impl LeafletMap {
    pub fn new(handle: JsValue) -> Self {
        Self { handle }
    }
}

impl TileEngine for LeafletMap {
    fn set_view(&mut self, center: GeoPoint, zoom: f64, animate: bool) {
        let r = news_map_set_view(&self.handle, center.lat_deg, center.lng_deg, zoom, animate);
        or_log("set_view", r, ());
    }

    fn center(&self) -> GeoPoint {
        let lat = or_log("center.lat", news_map_center(&self.handle, "lat"), 0.0);
        let lng = or_log("center.lng", news_map_center(&self.handle, "lng"), 0.0);
        GeoPoint::new(lat, lng)
    }

    fn zoom(&self) -> f64 {
        or_log("zoom", news_map_zoom(&self.handle), f64::NAN)
    }

    fn invalidate_size(&mut self) {
        or_log("invalidate_size", news_map_invalidate_size(&self.handle), ());
    }

    fn show_markers(&mut self, markers: &[Marker]) {
        let r = news_map_show_markers(&self.handle, &markers_json(markers));
        or_log("show_markers", r, ());
    }
}

/// CSS declarations for a layer style.
pub(crate) fn css_declarations(style: &LayerStyle) -> [(&'static str, String); 4] {
    [
        ("display", if style.displayed { "block" } else { "none" }.to_string()),
        ("opacity", format!("{}", style.opacity.clamp(0.0, 1.0))),
        (
            "pointer-events",
            if style.pointer_events { "auto" } else { "none" }.to_string(),
        ),
        ("z-index", style.z_index.to_string()),
    ]
}

/// The two stacked containers hosting the globe canvas and the Leaflet map.
pub struct DomLayers {
    orbital: HtmlElement,
    tile: HtmlElement,
}

fn html_element_by_id(id: &str) -> Result<HtmlElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let el = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?;
    el.dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not an HTML element")))
}

impl DomLayers {
    pub fn from_ids(orbital_id: &str, tile_id: &str) -> Result<Self, JsValue> {
        Ok(Self {
            orbital: html_element_by_id(orbital_id)?,
            tile: html_element_by_id(tile_id)?,
        })
    }
}

impl LayerHost for DomLayers {
    fn apply(&mut self, layer: Layer, style: &LayerStyle) {
        let el = match layer {
            Layer::Orbital => &self.orbital,
            Layer::Tile => &self.tile,
        };
        let css = el.style();
        for (name, value) in css_declarations(style) {
            if let Err(err) = css.set_property(name, &value) {
                debug!(name, ?err, "layer style rejected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{css_declarations, markers_json};
    use foundation::math::geodesy::GeoPoint;
    use pretty_assertions::assert_eq;
    use transition::{LayerStyle, Marker};

    #[test]
    fn hidden_tile_layer_is_inert() {
        let css = css_declarations(&LayerStyle::tile_hidden());
        assert_eq!(css[0], ("display", "none".to_string()));
        assert_eq!(css[1], ("opacity", "0".to_string()));
        assert_eq!(css[2], ("pointer-events", "none".to_string()));
        assert_eq!(css[3], ("z-index", "5".to_string()));

        let mut fading = LayerStyle::orbital_active();
        fading.opacity = 0.25;
        assert_eq!(css_declarations(&fading)[1], ("opacity", "0.25".to_string()));
    }

    #[test]
    fn markers_serialize_for_the_map_shim() {
        let markers = vec![Marker {
            position: GeoPoint::new(40.5, -3.5),
            city: "Madrid".to_string(),
            titles: vec!["a".to_string(), "b".to_string()],
            count: 2,
        }];
        let v: serde_json::Value = serde_json::from_str(&markers_json(&markers)).unwrap();
        assert_eq!(
            v,
            serde_json::json!([{"lat": 40.5, "lng": -3.5, "city": "Madrid", "titles": ["a", "b"], "count": 2}])
        );
    }
}

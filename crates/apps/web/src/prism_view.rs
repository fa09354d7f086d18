use foundation::ids::{FaceId, HechoId};
use prism::{CardGeometry, ComparisonColumns, LayoutMode, PrismView};
use streaming::protocol::Hecho;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use crate::markup;

const ROOT_ID: &str = "prism";
const ROTOR_ID: &str = "prism-rotor";
const FEED_ID: &str = "prism-feed";
const HEADER_ID: &str = "prism-header";

fn face_id(face: FaceId) -> String {
    format!("face-{}", face.as_str())
}

/// Content container of a face; the events face renders into the feed.
fn content_id(face: FaceId) -> String {
    match face {
        FaceId::Events => FEED_ID.to_string(),
        _ => format!("face-{}-content", face.as_str()),
    }
}

/// Prism markup already present in the page.
pub struct DomPrismView {
    document: Document,
    root: HtmlElement,
    rotor: HtmlElement,
    feed: HtmlElement,
    card_count: usize,
}

fn html_element(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not an HTML element")))
}

impl DomPrismView {
    pub fn from_document() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self {
            root: html_element(&document, ROOT_ID)?,
            rotor: html_element(&document, ROTOR_ID)?,
            feed: html_element(&document, FEED_ID)?,
            document,
            card_count: 0,
        })
    }

    fn element(&self, id: &str) -> Option<Element> {
        let el = self.document.get_element_by_id(id);
        if el.is_none() {
            debug!(id, "prism element missing");
        }
        el
    }

    fn set_html(&self, id: &str, html: &str) {
        if let Some(el) = self.element(id) {
            el.set_inner_html(html);
        }
    }

    fn card(&self, index: usize) -> Option<Element> {
        self.feed
            .query_selector(&format!(r#"[data-index="{index}"]"#))
            .ok()
            .flatten()
    }

    fn feed_center_y(&self) -> f64 {
        let rect = self.feed.get_bounding_client_rect();
        rect.top() + rect.height() / 2.0
    }

    /// Current card centers and the feed viewport center, in client pixels.
    pub fn card_geometry(&self) -> (Vec<CardGeometry>, f64) {
        let cards = (0..self.card_count)
            .filter_map(|index| {
                let rect = self.card(index)?.get_bounding_client_rect();
                Some(CardGeometry {
                    index,
                    center_px: rect.top() + rect.height() / 2.0,
                })
            })
            .collect();
        (cards, self.feed_center_y())
    }
}

impl PrismView for DomPrismView {
    fn set_layout(&mut self, mode: LayoutMode) {
        let _ = self.root.set_attribute("data-layout", mode.as_str());
        let display = if mode.shows_prism() { "" } else { "none" };
        let _ = self.root.style().set_property("display", display);
        if mode != LayoutMode::Phone {
            let _ = self.rotor.style().remove_property("transform");
        }
    }

    fn apply_rotation(&mut self, degrees: f64, animate: bool) {
        let css = self.rotor.style();
        let transition = if animate { "transform 0.45s ease" } else { "none" };
        let _ = css.set_property("transition", transition);
        let _ = css.set_property("transform", &format!("rotateY({degrees}deg)"));
    }

    fn apply_panel_order(&mut self, order: [FaceId; 3]) {
        for (slot, face) in order.iter().enumerate() {
            if let Some(el) = self.element(&face_id(*face)) {
                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    let _ = el.style().set_property("order", &slot.to_string());
                }
            }
        }
    }

    fn set_active_face(&mut self, face: FaceId) {
        for f in FaceId::ALL {
            if let Some(el) = self.element(&face_id(f)) {
                let _ = el.class_list().toggle_with_force("active", f == face);
            }
        }
    }

    fn render_feed(&mut self, hechos: &[Hecho]) {
        self.feed.set_inner_html(&markup::feed_html(hechos));
        self.card_count = hechos.len();
    }

    fn render_header(&mut self, selected: Option<&Hecho>, index: usize, total: usize) {
        self.set_html(HEADER_ID, &markup::header_html(selected, index, total));
    }

    fn show_loading(&mut self, face: FaceId) {
        self.set_html(&content_id(face), markup::LOADING_HTML);
    }

    fn render_comparison(&mut self, hecho: &HechoId, columns: &ComparisonColumns) {
        self.set_html(
            &content_id(FaceId::Comparison),
            &markup::comparison_html(hecho, columns),
        );
    }

    fn render_timeline(&mut self, macro_name: Option<&str>, hechos: &[Hecho], selected: Option<&HechoId>) {
        self.set_html(
            &content_id(FaceId::Timeline),
            &markup::timeline_html(macro_name, hechos, selected),
        );
    }

    fn card_center_offset(&self, index: usize) -> Option<f64> {
        let rect = self.card(index)?.get_bounding_client_rect();
        Some(rect.top() + rect.height() / 2.0 - self.feed_center_y())
    }

    fn scroll_feed_by(&mut self, delta_px: f64) {
        let top = self.feed.scroll_top() + delta_px.round() as i32;
        self.feed.set_scroll_top(top.max(0));
    }
}

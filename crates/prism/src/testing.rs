//! Recording view for controller tests.

use foundation::ids::{FaceId, HechoId};
use streaming::protocol::Hecho;

use crate::comparison::ComparisonColumns;
use crate::layout::LayoutMode;
use crate::scroll::CardGeometry;
use crate::view::PrismView;

pub const CARD_HEIGHT: f64 = 300.0;
pub const VIEWPORT_CENTER: f64 = 400.0;

#[derive(Debug, Default)]
pub struct RecordingView {
    pub log: Vec<String>,
    pub layout: Option<LayoutMode>,
    pub rotation: Option<(f64, bool)>,
    pub panel_order: Option<[FaceId; 3]>,
    pub active_face: Option<FaceId>,
    pub feed: Vec<HechoId>,
    pub feed_renders: usize,
    pub header: Option<(Option<HechoId>, usize, usize)>,
    pub comparison: Option<(HechoId, ComparisonColumns)>,
    pub timeline: Option<(Option<String>, Vec<HechoId>)>,
    pub scroll_top: f64,
}

impl RecordingView {
    pub fn card_center(&self, index: usize) -> f64 {
        index as f64 * CARD_HEIGHT + CARD_HEIGHT / 2.0 - self.scroll_top
    }

    pub fn geometry(&self) -> Vec<CardGeometry> {
        (0..self.feed.len())
            .map(|index| CardGeometry {
                index,
                center_px: self.card_center(index),
            })
            .collect()
    }

    /// Scrolls as a user would, without going through the controller.
    pub fn user_scroll_to_card(&mut self, index: usize) {
        self.scroll_top = index as f64 * CARD_HEIGHT + CARD_HEIGHT / 2.0 - VIEWPORT_CENTER;
    }

    pub fn position_of(&self, entry: &str) -> Option<usize> {
        self.log.iter().position(|l| l == entry)
    }
}

impl PrismView for RecordingView {
    fn set_layout(&mut self, mode: LayoutMode) {
        self.log.push(format!("layout {}", mode.as_str()));
        self.layout = Some(mode);
    }

    fn apply_rotation(&mut self, degrees: f64, animate: bool) {
        self.log.push(format!("rotate {degrees}"));
        self.rotation = Some((degrees, animate));
    }

    fn apply_panel_order(&mut self, order: [FaceId; 3]) {
        self.log.push(format!("panels {}", order[1].as_str()));
        self.panel_order = Some(order);
    }

    fn set_active_face(&mut self, face: FaceId) {
        self.log.push(format!("active {}", face.as_str()));
        self.active_face = Some(face);
    }

    fn render_feed(&mut self, hechos: &[Hecho]) {
        self.log.push(format!("feed {}", hechos.len()));
        self.feed = hechos.iter().map(|h| h.id.clone()).collect();
        self.feed_renders += 1;
    }

    fn render_header(&mut self, selected: Option<&Hecho>, index: usize, total: usize) {
        self.header = Some((selected.map(|h| h.id.clone()), index, total));
    }

    fn show_loading(&mut self, face: FaceId) {
        self.log.push(format!("loading {}", face.as_str()));
    }

    fn render_comparison(&mut self, hecho: &HechoId, columns: &ComparisonColumns) {
        self.log.push(format!("comparison {hecho}"));
        self.comparison = Some((hecho.clone(), columns.clone()));
    }

    fn render_timeline(&mut self, macro_name: Option<&str>, hechos: &[Hecho], _selected: Option<&HechoId>) {
        self.log.push(format!("timeline {}", hechos.len()));
        self.timeline = Some((
            macro_name.map(str::to_string),
            hechos.iter().map(|h| h.id.clone()).collect(),
        ));
    }

    fn card_center_offset(&self, index: usize) -> Option<f64> {
        (index < self.feed.len()).then(|| self.card_center(index) - VIEWPORT_CENTER)
    }

    fn scroll_feed_by(&mut self, delta_px: f64) {
        self.log.push(format!("scroll {delta_px}"));
        self.scroll_top += delta_px;
    }
}

use foundation::ids::{FaceId, HechoId};
use streaming::protocol::Hecho;

use crate::comparison::ComparisonColumns;
use crate::layout::LayoutMode;

/// Presentation the carousel controller drives.
///
/// Implemented over the DOM by the web host and by a recorder in tests.
pub trait PrismView {
    fn set_layout(&mut self, mode: LayoutMode);
    /// Phone layout: rotate the prism to `degrees` (cumulative).
    fn apply_rotation(&mut self, degrees: f64, animate: bool);
    /// Desktop layout: left, focused, right.
    fn apply_panel_order(&mut self, order: [FaceId; 3]);
    fn set_active_face(&mut self, face: FaceId);

    fn render_feed(&mut self, hechos: &[Hecho]);
    fn render_header(&mut self, selected: Option<&Hecho>, index: usize, total: usize);
    fn show_loading(&mut self, face: FaceId);
    fn render_comparison(&mut self, hecho: &HechoId, columns: &ComparisonColumns);
    fn render_timeline(&mut self, macro_name: Option<&str>, hechos: &[Hecho], selected: Option<&HechoId>);

    /// Signed distance (px) from the feed viewport center to the center of
    /// card `index`, measured now. `None` if the card is not laid out.
    fn card_center_offset(&self, index: usize) -> Option<f64>;
    /// Scrolls the feed instantly (no smooth scrolling).
    fn scroll_feed_by(&mut self, delta_px: f64);
}

use foundation::ids::{FaceId, HechoId};
use foundation::time::Time;
use streaming::protocol::{Endpoint, FetchPayload, Hecho};
use streaming::request::Ticket;
use streaming::residency::ContentState;
use streaming::sync::{Channel, FetchCommand, SyncKey, SyncLayer};
use tracing::{debug, info, warn};

use crate::comparison::ComparisonColumns;
use crate::config::PrismConfig;
use crate::gesture::{HitTarget, SwipeOutcome, SwipeTracker, SwipeUpdate};
use crate::layout::LayoutMode;
use crate::rotation::{PrismRotation, panel_order};
use crate::scroll::{CardGeometry, LockVerdict, NavigationLock, centered_card};
use crate::sequence::{ReadingFlow, day_of};
use crate::view::PrismView;

/// Which face is in front and which hecho is selected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CarouselSelection {
    pub current_face: FaceId,
    pub current_hecho_index: usize,
    /// Set while a programmatic scroll converges on this card.
    pub target_hecho_index: Option<usize>,
}

impl Default for CarouselSelection {
    fn default() -> Self {
        Self {
            current_face: FaceId::Events,
            current_hecho_index: 0,
            target_hecho_index: None,
        }
    }
}

fn channel_for(face: FaceId) -> Channel {
    match face {
        FaceId::Comparison => Channel::Comparison,
        FaceId::Events => Channel::Events,
        FaceId::Timeline => Channel::Timeline,
    }
}

/// Carousel controller.
///
/// Every operation that may need data returns the fetches the host must run;
/// their results come back through [`PrismController::on_fetch_complete`].
pub struct PrismController<V> {
    config: PrismConfig,
    view: V,
    layout: LayoutMode,
    flow: ReadingFlow,
    selection: CarouselSelection,
    rotation: PrismRotation,
    lock: NavigationLock,
    swipe: SwipeTracker,
    sync: SyncLayer,
    timeline: Vec<Hecho>,
    /// Fact picked from the timeline whose same-day context is pending.
    context_anchor: Option<HechoId>,
}

impl<V: PrismView> PrismController<V> {
    pub fn new(config: PrismConfig, layout: LayoutMode, view: V) -> Self {
        let mut ctl = Self {
            lock: NavigationLock::new(config.proximity_px, config.lock_timeout_ms),
            config,
            view,
            layout,
            flow: ReadingFlow::new(),
            selection: CarouselSelection::default(),
            rotation: PrismRotation::default(),
            swipe: SwipeTracker::default(),
            sync: SyncLayer::new(),
            timeline: Vec::new(),
            context_anchor: None,
        };
        ctl.rotation.rotate_to(ctl.selection.current_face);
        ctl.view.set_layout(layout);
        ctl.present(false);
        ctl
    }

    pub fn config(&self) -> &PrismConfig {
        &self.config
    }

    /// Replaces the tuning. A navigation in progress keeps its old timeout.
    pub fn set_config(&mut self, config: PrismConfig) {
        if !self.lock.is_held() {
            self.lock = NavigationLock::new(config.proximity_px, config.lock_timeout_ms);
        }
        self.config = config;
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    pub fn flow(&self) -> &ReadingFlow {
        &self.flow
    }

    pub fn selection(&self) -> CarouselSelection {
        self.selection
    }

    pub fn rotation(&self) -> PrismRotation {
        self.rotation
    }

    pub fn lock(&self) -> &NavigationLock {
        &self.lock
    }

    pub fn sync(&self) -> &SyncLayer {
        &self.sync
    }

    pub fn selected(&self) -> Option<&Hecho> {
        self.flow.get(self.selection.current_hecho_index)
    }

    fn selected_id(&self) -> Option<HechoId> {
        self.selected().map(|h| h.id.clone())
    }

    fn present(&mut self, animate: bool) {
        let face = self.selection.current_face;
        match self.layout {
            LayoutMode::Phone => self.view.apply_rotation(self.rotation.degrees(), animate),
            LayoutMode::Desktop => self.view.apply_panel_order(panel_order(face)),
            LayoutMode::FullscreenGlobe => return,
        }
        self.view.set_active_face(face);
    }

    fn render_header(&mut self) {
        let index = self.selection.current_hecho_index;
        let total = self.flow.len();
        self.view.render_header(self.flow.get(index), index, total);
    }

    fn render_feed_if_changed(&mut self) {
        if self.sync.mark_rendered(Channel::Events, SyncKey::Len(self.flow.len())) {
            self.view.render_feed(self.flow.items());
        }
    }

    /// Re-renders the feed after a reorder that may keep the same length.
    fn force_render_feed(&mut self) {
        self.sync.invalidate(Channel::Events);
        self.render_feed_if_changed();
    }

    fn begin_face(
        &mut self,
        face: FaceId,
        key: SyncKey,
        endpoint: Endpoint,
    ) -> Option<FetchCommand> {
        let channel = channel_for(face);
        let first_load = self.sync.state(channel) == ContentState::Empty;
        let cmd = self.sync.begin(channel, key, endpoint)?;
        if first_load {
            self.view.show_loading(face);
        }
        Some(cmd)
    }

    /// Brings `face` up to date with the selected hecho.
    fn load_face(&mut self, face: FaceId) -> Option<FetchCommand> {
        if face == FaceId::Events {
            self.render_feed_if_changed();
            return None;
        }
        let hecho = self.selected()?;
        let id = hecho.id.clone();
        let macro_name = hecho.macroevento.clone().filter(|m| !m.trim().is_empty());

        match face {
            FaceId::Comparison => self.begin_face(
                face,
                SyncKey::Hecho(id.clone()),
                Endpoint::HechoArticles { id },
            ),
            FaceId::Timeline => match macro_name {
                Some(macro_name) => {
                    self.begin_face(face, SyncKey::Hecho(id), Endpoint::Timeline { macro_name })
                }
                None => {
                    if self.sync.mark_rendered(Channel::Timeline, SyncKey::Hecho(id.clone())) {
                        self.timeline.clear();
                        self.view.render_timeline(None, &[], Some(&id));
                    }
                    None
                }
            },
            FaceId::Events => None,
        }
    }

    /// Async faces to refresh after a selection change: all of them on
    /// desktop, only the visible one on phone.
    fn load_selection_faces(&mut self) -> Vec<FetchCommand> {
        let faces: Vec<FaceId> = match self.layout {
            LayoutMode::Desktop => vec![FaceId::Comparison, FaceId::Timeline],
            LayoutMode::Phone if self.selection.current_face.loads_async() => {
                vec![self.selection.current_face]
            }
            LayoutMode::Phone | LayoutMode::FullscreenGlobe => Vec::new(),
        };
        faces.into_iter().filter_map(|f| self.load_face(f)).collect()
    }

    fn select_index(&mut self, index: usize) -> Vec<FetchCommand> {
        if index >= self.flow.len() {
            return Vec::new();
        }
        self.selection.current_hecho_index = index;
        self.render_header();
        if let Some(h) = self.selected() {
            info!(index, id = %h.id, "hecho selected");
        }
        self.load_selection_faces()
    }

    /// Requests the initial set of recent hechos.
    pub fn load_seed(&mut self) -> Vec<FetchCommand> {
        self.sync
            .begin(Channel::Seed, SyncKey::Recent, Endpoint::RecentHechos)
            .into_iter()
            .collect()
    }

    pub fn rotate_to(&mut self, face: FaceId) -> Vec<FetchCommand> {
        if !self.layout.shows_prism() {
            debug!(face = face.as_str(), "rotation ignored: prism hidden");
            return Vec::new();
        }
        self.selection.current_face = face;
        self.rotation.rotate_to(face);
        self.present(true);
        info!(face = face.as_str(), degrees = self.rotation.degrees(), "prism face");
        self.load_face(face).into_iter().collect()
    }

    pub fn rotate_left(&mut self) -> Vec<FetchCommand> {
        self.rotate_to(self.selection.current_face.prev())
    }

    pub fn rotate_right(&mut self) -> Vec<FetchCommand> {
        self.rotate_to(self.selection.current_face.next())
    }

    pub fn touch_start(&mut self, x: f64, y: f64, hit: HitTarget) {
        if self.layout != LayoutMode::Phone {
            return;
        }
        self.swipe.start(x, y, hit, &self.config);
    }

    /// Returns true when the prism took the move (host should cancel native
    /// scrolling for it).
    pub fn touch_move(&mut self, x: f64, y: f64) -> bool {
        match self.swipe.update(x, y) {
            SwipeUpdate::Dragging { dx_px } => {
                let preview = self.rotation.drag_preview(dx_px, self.config.face_width_px);
                self.view.apply_rotation(preview, false);
                true
            }
            SwipeUpdate::Idle | SwipeUpdate::Scrolling => false,
        }
    }

    pub fn touch_end(&mut self) -> Vec<FetchCommand> {
        match self.swipe.end(self.config.release_threshold_px) {
            SwipeOutcome::Next => self.rotate_right(),
            SwipeOutcome::Previous => self.rotate_left(),
            SwipeOutcome::SnapBack => {
                self.view.apply_rotation(self.rotation.degrees(), true);
                Vec::new()
            }
            SwipeOutcome::None => Vec::new(),
        }
    }

    /// Scroll observer for the events feed.
    pub fn on_feed_scroll(
        &mut self,
        cards: &[CardGeometry],
        viewport_center_px: f64,
    ) -> Vec<FetchCommand> {
        let centered = centered_card(cards, viewport_center_px);
        match self.lock.observe(centered) {
            LockVerdict::Suppressed => Vec::new(),
            LockVerdict::Converged(target) => {
                debug!(target, "programmatic scroll arrived");
                self.selection.target_hecho_index = None;
                if target != self.selection.current_hecho_index {
                    self.select_index(target)
                } else {
                    Vec::new()
                }
            }
            LockVerdict::Free => match centered {
                Some((index, _)) if index != self.selection.current_hecho_index => {
                    self.select_index(index)
                }
                _ => Vec::new(),
            },
        }
    }

    /// Per-frame housekeeping: forced release of a stuck navigation lock.
    pub fn tick(&mut self, now: Time) -> Vec<FetchCommand> {
        let Some(target) = self.lock.poll(now) else {
            return Vec::new();
        };
        self.selection.target_hecho_index = None;
        if target != self.selection.current_hecho_index {
            self.select_index(target)
        } else {
            Vec::new()
        }
    }

    fn navigate_to_index(&mut self, index: usize, now: Time) -> Vec<FetchCommand> {
        if index >= self.flow.len() {
            return Vec::new();
        }
        self.selection.target_hecho_index = Some(index);
        self.lock.arm(index, now);
        let cmds = self.select_index(index);

        match self.view.card_center_offset(index) {
            Some(offset) if offset.abs() >= 0.5 => self.view.scroll_feed_by(offset),
            Some(_) => {}
            None => debug!(index, "card not laid out; lock will time out"),
        }
        cmds
    }

    /// Selects `id` and scrolls the feed to it without letting the scroll
    /// observer interfere.
    pub fn navigate_to_hecho(&mut self, id: &HechoId, now: Time) -> Vec<FetchCommand> {
        match self.flow.position(id) {
            Some(index) => self.navigate_to_index(index, now),
            None => {
                debug!(%id, "navigate: hecho not in reading flow");
                Vec::new()
            }
        }
    }

    /// Timeline node selected: splice the fact after the current one, pull in
    /// its same-day context, refresh the other faces and focus the feed.
    pub fn select_from_timeline(&mut self, id: &HechoId, now: Time) -> Vec<FetchCommand> {
        let hecho = self
            .timeline
            .iter()
            .find(|h| h.id == *id)
            .cloned()
            .or_else(|| self.flow.find(id).cloned());
        let Some(hecho) = hecho else {
            debug!(%id, "timeline selection for unknown hecho");
            return Vec::new();
        };
        let anchor = self.selected_id();
        let mut cmds = Vec::new();

        let day = day_of(&hecho.date).to_string();
        if !day.is_empty() {
            self.context_anchor = Some(id.clone());
            cmds.extend(self.sync.begin(
                Channel::Context,
                SyncKey::Date(day.clone()),
                Endpoint::HechosByDate { date: day },
            ));
        }

        let index = self.flow.insert_after(anchor.as_ref(), hecho);
        info!(%id, index, anchor = ?anchor, "hecho spliced into reading flow");
        self.force_render_feed();

        for face in [FaceId::Comparison, FaceId::Timeline] {
            self.sync.invalidate(channel_for(face));
            self.view.show_loading(face);
        }

        cmds.extend(self.rotate_to(FaceId::Events));
        cmds.extend(self.navigate_to_index(index, now));
        cmds
    }

    /// Applies a fetch result. Responses that are no longer current are
    /// dropped; failures leave existing content in place.
    pub fn on_fetch_complete(
        &mut self,
        ticket: Ticket,
        result: Result<FetchPayload, String>,
    ) -> Vec<FetchCommand> {
        let payload = match result {
            Ok(payload) => payload,
            Err(reason) => {
                if let Err(e) = self.sync.fail(ticket, &reason) {
                    debug!(%e, "failure of an outdated fetch ignored");
                }
                return Vec::new();
            }
        };
        let channel = match self.sync.complete(ticket) {
            Ok(channel) => channel,
            Err(e) => {
                debug!(%e, "response dropped");
                return Vec::new();
            }
        };
        let key = self.sync.key(channel).cloned();

        match (channel, payload, key) {
            (Channel::Seed, FetchPayload::Hechos(list), _) => {
                info!(count = list.len(), "seed hechos loaded");
                self.flow.replace_all(list);
                self.selection.current_hecho_index = 0;
                self.force_render_feed();
                self.render_header();
                self.load_selection_faces()
            }
            (Channel::Comparison, FetchPayload::Articles(articles), Some(SyncKey::Hecho(id))) => {
                let columns = ComparisonColumns::build(&articles, &self.config.preferred_sources);
                self.view.render_comparison(&id, &columns);
                Vec::new()
            }
            (Channel::Timeline, FetchPayload::Hechos(list), Some(SyncKey::Hecho(id))) => {
                let macro_name = self.flow.find(&id).and_then(|h| h.macroevento.clone());
                self.timeline = list;
                self.view
                    .render_timeline(macro_name.as_deref(), &self.timeline, Some(&id));
                Vec::new()
            }
            (Channel::Context, FetchPayload::Hechos(list), Some(SyncKey::Date(date))) => {
                let selected = self.selected_id();
                let Some(anchor) = self.context_anchor.take().or_else(|| selected.clone()) else {
                    return Vec::new();
                };
                let added = self.flow.merge_context(&anchor, list, &date);
                debug!(%date, %anchor, added, "context merged");
                if added > 0 {
                    // Keep the selection on the same fact when cards shift.
                    if let Some(pos) = selected.and_then(|id| self.flow.position(&id)) {
                        self.selection.current_hecho_index = pos;
                    }
                    self.force_render_feed();
                    self.render_header();
                }
                Vec::new()
            }
            (channel, payload, _) => {
                warn!(channel = channel.as_str(), len = payload.len(), "unexpected payload");
                Vec::new()
            }
        }
    }

    pub fn set_layout(&mut self, mode: LayoutMode) -> Vec<FetchCommand> {
        if mode == self.layout {
            return Vec::new();
        }
        info!(from = self.layout.as_str(), to = mode.as_str(), "layout");
        self.layout = mode;
        self.swipe = SwipeTracker::default();
        self.view.set_layout(mode);
        if !mode.shows_prism() {
            return Vec::new();
        }
        self.present(false);
        self.load_selection_faces()
    }

    /// Breakpoint check. An explicit fullscreen-globe toggle is kept.
    pub fn on_viewport_resize(&mut self, width_px: f64) -> Vec<FetchCommand> {
        if self.layout == LayoutMode::FullscreenGlobe {
            return Vec::new();
        }
        self.set_layout(LayoutMode::for_width(width_px, self.config.breakpoint_px))
    }
}

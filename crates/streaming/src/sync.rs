use std::collections::BTreeMap;

use foundation::ids::HechoId;
use runtime::metrics::Metrics;
use tracing::{debug, warn};

use crate::protocol::Endpoint;
use crate::request::Ticket;
use crate::residency::ContentState;

pub const FETCH_ISSUED: &str = "fetch.issued";
pub const FETCH_SKIPPED: &str = "fetch.skipped";
pub const FETCH_SUPERSEDED: &str = "fetch.superseded";
pub const FETCH_FAILED: &str = "fetch.failed";
pub const RENDER_SKIPPED: &str = "render.skipped";
pub const FETCH_IN_FLIGHT: &str = "fetch.in_flight";

/// Independently synchronized content slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// Comparison face, keyed by hecho.
    Comparison,
    /// Events feed, keyed by dataset length.
    Events,
    /// Timeline face, keyed by hecho.
    Timeline,
    /// Same-date context merged into the reading flow.
    Context,
    /// Initial set of recent hechos.
    Seed,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Comparison => "comparison",
            Channel::Events => "events",
            Channel::Timeline => "timeline",
            Channel::Context => "context",
            Channel::Seed => "seed",
        }
    }
}

/// What a channel's content was last synchronized against.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyncKey {
    Hecho(HechoId),
    Len(usize),
    Date(String),
    Recent,
}

/// A fetch the host must perform and report back with its ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    pub ticket: Ticket,
    pub channel: Channel,
    pub endpoint: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A newer fetch (or an invalidation) replaced this one.
    Superseded { channel: Channel, ticket: Ticket },
    /// The ticket was never issued or was already settled.
    UnknownTicket(Ticket),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Superseded { channel, ticket } => {
                write!(f, "{} fetch #{} superseded", channel.as_str(), ticket.0)
            }
            SyncError::UnknownTicket(ticket) => write!(f, "unknown fetch ticket #{}", ticket.0),
        }
    }
}

impl std::error::Error for SyncError {}

#[derive(Debug, Clone, Default)]
struct Slot {
    state: ContentState,
    key: Option<SyncKey>,
    in_flight: Option<(Ticket, SyncKey)>,
    has_content: bool,
}

/// Per-channel cache-key bookkeeping with last-caller-wins fetch tickets.
///
/// The layer never holds content itself; it decides whether a fetch or a
/// render is needed and whether a late response may still be applied.
#[derive(Debug, Default)]
pub struct SyncLayer {
    next_ticket: u64,
    slots: BTreeMap<Channel, Slot>,
    tickets: BTreeMap<Ticket, Channel>,
    metrics: Metrics,
}

impl SyncLayer {
    pub fn new() -> Self {
        Self {
            next_ticket: 1,
            ..Self::default()
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn state(&self, channel: Channel) -> ContentState {
        self.slots.get(&channel).map(|s| s.state).unwrap_or_default()
    }

    pub fn key(&self, channel: Channel) -> Option<&SyncKey> {
        self.slots.get(&channel).and_then(|s| s.key.as_ref())
    }

    pub fn current_ticket(&self, channel: Channel) -> Option<Ticket> {
        self.slots
            .get(&channel)
            .and_then(|s| s.in_flight.as_ref().map(|(t, _)| *t))
    }

    pub fn is_fresh(&self, channel: Channel, key: &SyncKey) -> bool {
        self.slots
            .get(&channel)
            .is_some_and(|s| s.state == ContentState::Ready && s.key.as_ref() == Some(key))
    }

    /// Requests content for `key`. Returns `None` when the channel already
    /// holds it or is already fetching it.
    pub fn begin(
        &mut self,
        channel: Channel,
        key: SyncKey,
        endpoint: Endpoint,
    ) -> Option<FetchCommand> {
        if self.is_fresh(channel, &key) {
            debug!(channel = channel.as_str(), ?key, "fetch skipped: content fresh");
            self.metrics.inc(FETCH_SKIPPED);
            return None;
        }

        let slot = self.slots.entry(channel).or_default();
        if let Some((_, pending)) = &slot.in_flight {
            if *pending == key {
                debug!(channel = channel.as_str(), ?key, "fetch skipped: already in flight");
                self.metrics.inc(FETCH_SKIPPED);
                return None;
            }
        }

        let ticket = Ticket(self.next_ticket.max(1));
        self.next_ticket = ticket.0 + 1;

        slot.state = ContentState::Loading;
        slot.in_flight = Some((ticket, key));
        self.tickets.insert(ticket, channel);
        self.metrics.inc(FETCH_ISSUED);
        self.update_in_flight_gauge();

        Some(FetchCommand {
            ticket,
            channel,
            endpoint,
        })
    }

    fn settle(&mut self, ticket: Ticket) -> Result<(Channel, SyncKey), SyncError> {
        let channel = self
            .tickets
            .remove(&ticket)
            .ok_or(SyncError::UnknownTicket(ticket))?;
        let slot = self.slots.entry(channel).or_default();
        let current = matches!(&slot.in_flight, Some((t, _)) if *t == ticket);
        if !current {
            debug!(channel = channel.as_str(), ticket = ticket.0, "dropping superseded response");
            self.metrics.inc(FETCH_SUPERSEDED);
            return Err(SyncError::Superseded { channel, ticket });
        }
        let Some((_, key)) = slot.in_flight.take() else {
            return Err(SyncError::UnknownTicket(ticket));
        };
        self.update_in_flight_gauge();
        Ok((channel, key))
    }

    /// Accepts a successful response. On `Ok` the caller applies the content.
    pub fn complete(&mut self, ticket: Ticket) -> Result<Channel, SyncError> {
        let (channel, key) = self.settle(ticket)?;
        let slot = self.slots.entry(channel).or_default();
        slot.state = ContentState::Ready;
        slot.key = Some(key);
        slot.has_content = true;
        Ok(channel)
    }

    /// Records a failed fetch. Previous content stays in place (stale); a
    /// channel that never loaded keeps showing its placeholder.
    pub fn fail(&mut self, ticket: Ticket, reason: &str) -> Result<Channel, SyncError> {
        let (channel, key) = self.settle(ticket)?;
        warn!(channel = channel.as_str(), ?key, reason, "fetch failed");
        self.metrics.inc(FETCH_FAILED);
        let slot = self.slots.entry(channel).or_default();
        slot.state = if slot.has_content {
            ContentState::Stale
        } else {
            ContentState::Loading
        };
        Ok(channel)
    }

    /// Forgets the channel's key so the next `begin` refetches. Any response
    /// still in flight for it is dropped on arrival.
    pub fn invalidate(&mut self, channel: Channel) {
        let slot = self.slots.entry(channel).or_default();
        slot.key = None;
        slot.in_flight = None;
        slot.state = if slot.has_content {
            ContentState::Stale
        } else {
            ContentState::Empty
        };
        self.update_in_flight_gauge();
    }

    /// Records a render for channels without a fetch. Returns `false` (and
    /// counts a skipped render) when the channel was already fresh for `key`.
    pub fn mark_rendered(&mut self, channel: Channel, key: SyncKey) -> bool {
        if self.is_fresh(channel, &key) {
            self.metrics.inc(RENDER_SKIPPED);
            return false;
        }
        let slot = self.slots.entry(channel).or_default();
        slot.state = ContentState::Ready;
        slot.key = Some(key);
        slot.has_content = true;
        true
    }

    fn update_in_flight_gauge(&mut self) {
        let n = self.slots.values().filter(|s| s.in_flight.is_some()).count();
        self.metrics.set_gauge(FETCH_IN_FLIGHT, n as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn articles(id: &str) -> (SyncKey, Endpoint) {
        (
            SyncKey::Hecho(id.into()),
            Endpoint::HechoArticles { id: id.into() },
        )
    }

    #[test]
    fn same_key_is_fetched_once() {
        let mut sync = SyncLayer::new();
        let (key, ep) = articles("H1");
        let cmd = sync.begin(Channel::Comparison, key.clone(), ep.clone()).unwrap();
        assert_eq!(sync.state(Channel::Comparison), ContentState::Loading);

        // In flight: no duplicate.
        assert!(sync.begin(Channel::Comparison, key.clone(), ep.clone()).is_none());

        assert_eq!(sync.complete(cmd.ticket), Ok(Channel::Comparison));
        assert_eq!(sync.state(Channel::Comparison), ContentState::Ready);

        // Ready: no refetch.
        assert!(sync.begin(Channel::Comparison, key, ep).is_none());
        assert_eq!(sync.metrics().counter(FETCH_ISSUED), 1);
        assert_eq!(sync.metrics().counter(FETCH_SKIPPED), 2);
    }

    #[test]
    fn late_response_for_old_selection_is_dropped() {
        let mut sync = SyncLayer::new();
        let (k1, e1) = articles("H1");
        let (k2, e2) = articles("H2");
        let slow = sync.begin(Channel::Comparison, k1, e1).unwrap();
        let fast = sync.begin(Channel::Comparison, k2.clone(), e2).unwrap();
        assert!(fast.ticket > slow.ticket);

        assert_eq!(sync.complete(fast.ticket), Ok(Channel::Comparison));
        assert_eq!(
            sync.complete(slow.ticket),
            Err(SyncError::Superseded {
                channel: Channel::Comparison,
                ticket: slow.ticket
            })
        );
        assert_eq!(sync.key(Channel::Comparison), Some(&k2));
        assert_eq!(sync.metrics().counter(FETCH_SUPERSEDED), 1);
    }

    #[test]
    fn unknown_and_double_settled_tickets() {
        let mut sync = SyncLayer::new();
        assert_eq!(sync.complete(Ticket(99)), Err(SyncError::UnknownTicket(Ticket(99))));

        let (k, e) = articles("H1");
        let cmd = sync.begin(Channel::Timeline, k, e).unwrap();
        assert!(sync.complete(cmd.ticket).is_ok());
        assert_eq!(sync.complete(cmd.ticket), Err(SyncError::UnknownTicket(cmd.ticket)));
    }

    #[test]
    fn failure_keeps_previous_content_or_placeholder() {
        let mut sync = SyncLayer::new();
        let (k1, e1) = articles("H1");
        let first = sync.begin(Channel::Timeline, k1.clone(), e1.clone()).unwrap();
        sync.fail(first.ticket, "503").unwrap();
        // Never loaded: spinner stays.
        assert_eq!(sync.state(Channel::Timeline), ContentState::Loading);
        assert_eq!(sync.metrics().counter(FETCH_FAILED), 1);

        // No retry policy, but a later request for the same key may go out.
        let retry = sync.begin(Channel::Timeline, k1.clone(), e1).unwrap();
        sync.complete(retry.ticket).unwrap();

        let (k2, e2) = articles("H2");
        let next = sync.begin(Channel::Timeline, k2, e2).unwrap();
        sync.fail(next.ticket, "network").unwrap();
        assert_eq!(sync.state(Channel::Timeline), ContentState::Stale);
        // The last good key is still the one on screen.
        assert_eq!(sync.key(Channel::Timeline), Some(&k1));
    }

    #[test]
    fn invalidate_forces_reload_and_drops_in_flight() {
        let mut sync = SyncLayer::new();
        let (k, e) = articles("H1");
        let cmd = sync.begin(Channel::Comparison, k.clone(), e.clone()).unwrap();
        sync.complete(cmd.ticket).unwrap();

        sync.invalidate(Channel::Comparison);
        assert_eq!(sync.state(Channel::Comparison), ContentState::Stale);
        assert!(sync.state(Channel::Comparison).shows_placeholder());

        let reload = sync.begin(Channel::Comparison, k.clone(), e.clone()).unwrap();
        sync.invalidate(Channel::Comparison);
        assert!(matches!(
            sync.complete(reload.ticket),
            Err(SyncError::Superseded { .. })
        ));
        assert_eq!(sync.metrics().gauge(FETCH_IN_FLIGHT), Some(0));
    }

    #[test]
    fn render_only_channel_skips_unchanged_length() {
        let mut sync = SyncLayer::new();
        assert!(sync.mark_rendered(Channel::Events, SyncKey::Len(40)));
        assert!(!sync.mark_rendered(Channel::Events, SyncKey::Len(40)));
        assert!(sync.mark_rendered(Channel::Events, SyncKey::Len(41)));
        assert_eq!(sync.metrics().counter(RENDER_SKIPPED), 1);
    }

    #[test]
    fn channels_are_independent() {
        let mut sync = SyncLayer::new();
        let (k, e) = articles("H1");
        let a = sync.begin(Channel::Comparison, k.clone(), e.clone()).unwrap();
        let b = sync.begin(Channel::Timeline, k, e).unwrap();
        assert_ne!(a.ticket, b.ticket);
        assert_eq!(sync.metrics().gauge(FETCH_IN_FLIGHT), Some(2));
        assert_eq!(sync.current_ticket(Channel::Timeline), Some(b.ticket));
        sync.complete(b.ticket).unwrap();
        assert_eq!(sync.state(Channel::Comparison), ContentState::Loading);
        assert_eq!(sync.state(Channel::Timeline), ContentState::Ready);
    }
}

/// Content lifecycle of one face/channel.
///
/// Empty → Loading → Ready, with Ready → Stale on invalidation and
/// Stale → Loading when the next fetch is issued.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ContentState {
    /// Nothing loaded yet and nothing requested.
    #[default]
    Empty,
    /// A fetch is in flight.
    Loading,
    /// Content matches the recorded key.
    Ready,
    /// Content present but no longer matches the selection.
    Stale,
}

impl ContentState {
    /// Whether the host should show a loading placeholder.
    pub fn shows_placeholder(self) -> bool {
        matches!(self, ContentState::Loading | ContentState::Stale)
    }
}

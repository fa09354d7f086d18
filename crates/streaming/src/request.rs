/// Identifies one issued fetch.
///
/// Tickets are allocated monotonically by the sync layer; a response is only
/// applied if its ticket is still the current one for its channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

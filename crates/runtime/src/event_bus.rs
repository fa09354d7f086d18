use std::collections::VecDeque;

use foundation::time::Time;

/// Entries kept by [`EventBus::new`].
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A state change, stamped with the time it happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub time: Time,
    pub kind: E,
}

/// Bounded log of recent state changes; the oldest entry goes first once
/// full. Owners emit, hosts and tests inspect or drain.
#[derive(Debug)]
pub struct EventBus<E> {
    events: VecDeque<Event<E>>,
    capacity: usize,
    dropped: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn emit(&mut self, time: Time, kind: E) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(Event { time, kind });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event<E>> {
        self.events.iter()
    }

    pub fn last(&self) -> Option<&Event<E>> {
        self.events.back()
    }

    /// Events evicted because the log was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::time::Time;

    #[test]
    fn keeps_most_recent_events() {
        let mut bus = EventBus::with_capacity(2);
        bus.emit(Time(0.1), "a");
        bus.emit(Time(0.2), "b");
        bus.emit(Time(0.3), "c");
        let kinds: Vec<&str> = bus.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["b", "c"]);
        assert_eq!(bus.dropped(), 1);
        assert_eq!(bus.last().map(|e| e.time), Some(Time(0.3)));
    }

    #[test]
    fn drain_empties_the_log() {
        let mut bus = EventBus::new();
        bus.emit(Time(0.0), 1u8);
        assert_eq!(bus.drain().len(), 1);
        assert!(bus.is_empty());
        assert_eq!(bus.dropped(), 0);
    }
}

use std::collections::BTreeMap;

use serde::Serialize;

/// Named counters and gauges of one subsystem.
///
/// Names are static so call sites share constants with the code that reads
/// them back.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<&'static str, u64>,
    gauges: BTreeMap<&'static str, i64>,
}

/// Point-in-time copy, serializable for the host's debug panel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<&'static str, u64>,
    pub gauges: BTreeMap<&'static str, i64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&mut self, name: &'static str) {
        self.add(name, 1);
    }

    pub fn add(&mut self, name: &'static str, by: u64) {
        let c = self.counters.entry(name).or_insert(0);
        *c = c.saturating_add(by);
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn set_gauge(&mut self, name: &'static str, value: i64) {
        self.gauges.insert(name, value);
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).copied()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.clone(),
            gauges: self.gauges.clone(),
        }
    }

    /// Zeroes counters; gauges describe current state and are kept.
    pub fn reset_counters(&mut self) {
        self.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::Metrics;

    #[test]
    fn counters_start_at_zero_and_saturate() {
        let mut m = Metrics::new();
        assert_eq!(m.counter("fetch.issued"), 0);
        m.inc("fetch.issued");
        m.add("fetch.issued", 2);
        assert_eq!(m.counter("fetch.issued"), 3);

        m.add("big", u64::MAX);
        m.inc("big");
        assert_eq!(m.counter("big"), u64::MAX);
    }

    #[test]
    fn reset_keeps_gauges() {
        let mut m = Metrics::new();
        m.inc("fetch.failed");
        m.set_gauge("fetch.in_flight", 2);
        m.set_gauge("fetch.in_flight", 1);
        m.reset_counters();
        assert_eq!(m.counter("fetch.failed"), 0);
        assert_eq!(m.gauge("fetch.in_flight"), Some(1));
    }

    #[test]
    fn snapshot_serializes_in_name_order() {
        let mut m = Metrics::new();
        m.inc("fetch.skipped");
        m.inc("fetch.issued");
        m.set_gauge("fetch.in_flight", 0);
        let json = serde_json::to_string(&m.snapshot()).unwrap();
        assert_eq!(
            json,
            r#"{"counters":{"fetch.issued":1,"fetch.skipped":1},"gauges":{"fetch.in_flight":0}}"#
        );
    }
}

use std::collections::BTreeMap;

use foundation::ids::HechoId;
use streaming::protocol::Hecho;

/// The shared, ordered list of hechos behind the events feed.
///
/// Order is the reader's navigation order, not chronological: selected facts
/// are spliced next to the fact they were reached from, and nothing ever
/// re-sorts by date. Ids are unique.
#[derive(Debug, Clone, Default)]
pub struct ReadingFlow {
    items: Vec<Hecho>,
    index: BTreeMap<HechoId, usize>,
}

impl ReadingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Hecho] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Hecho> {
        self.items.get(index)
    }

    pub fn position(&self, id: &HechoId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn find(&self, id: &HechoId) -> Option<&Hecho> {
        self.position(id).and_then(|i| self.items.get(i))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|h| h.id.as_str()).collect()
    }

    fn reindex(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(i, h)| (h.id.clone(), i))
            .collect();
    }

    /// Replaces the whole sequence, keeping the first of any duplicate ids.
    pub fn replace_all(&mut self, hechos: Vec<Hecho>) {
        self.items.clear();
        self.index.clear();
        for h in hechos {
            if self.index.contains_key(&h.id) {
                continue;
            }
            self.index.insert(h.id.clone(), self.items.len());
            self.items.push(h);
        }
    }

    /// Places `hecho` immediately after `anchor`, moving it if already
    /// present. Without a known anchor it goes first. Returns its new index.
    pub fn insert_after(&mut self, anchor: Option<&HechoId>, hecho: Hecho) -> usize {
        if anchor == Some(&hecho.id) {
            if let Some(pos) = self.position(&hecho.id) {
                self.items[pos] = hecho;
                return pos;
            }
        }
        if let Some(pos) = self.position(&hecho.id) {
            self.items.remove(pos);
            self.reindex();
        }
        let at = anchor
            .and_then(|a| self.position(a))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.items.insert(at, hecho);
        self.reindex();
        at
    }

    /// Splices `context` facts dated `date` in after `anchor`, in the order
    /// given, skipping ids already present. Returns how many were added.
    pub fn merge_context(&mut self, anchor: &HechoId, context: Vec<Hecho>, date: &str) -> usize {
        let Some(anchor_pos) = self.position(anchor) else {
            return 0;
        };
        let mut at = anchor_pos + 1;
        let mut added = 0;
        for h in context {
            if !same_day(&h.date, date) || self.index.contains_key(&h.id) {
                continue;
            }
            self.index.insert(h.id.clone(), at);
            self.items.insert(at, h);
            at += 1;
            added += 1;
        }
        if added > 0 {
            self.reindex();
        }
        added
    }
}

/// Calendar day of an API date, dropping any time part.
pub fn day_of(date: &str) -> &str {
    date.split(['T', ' ']).next().unwrap_or(date)
}

fn same_day(candidate: &str, date: &str) -> bool {
    !date.is_empty() && candidate.starts_with(date)
}

#[cfg(test)]
mod tests {
    use super::{ReadingFlow, day_of};
    use foundation::ids::HechoId;
    use pretty_assertions::assert_eq;
    use streaming::protocol::Hecho;

    fn h(id: &str, date: &str) -> Hecho {
        Hecho::new(id, date, format!("text {id}"))
    }

    fn flow(ids: &[(&str, &str)]) -> ReadingFlow {
        let mut f = ReadingFlow::new();
        f.replace_all(ids.iter().map(|(id, d)| h(id, d)).collect());
        f
    }

    #[test]
    fn insert_lands_right_after_anchor_ignoring_dates() {
        let mut f = flow(&[("A", "2025-07-01"), ("B", "2025-06-01"), ("C", "2025-08-01")]);
        let at = f.insert_after(Some(&HechoId::from("A")), h("X", "1999-01-01"));
        assert_eq!(at, 1);
        assert_eq!(f.ids(), vec!["A", "X", "B", "C"]);
    }

    #[test]
    fn insert_moves_existing_entry_from_either_side() {
        let mut f = flow(&[("A", ""), ("B", ""), ("X", ""), ("C", "")]);
        assert_eq!(f.insert_after(Some(&HechoId::from("A")), h("X", "")), 1);
        assert_eq!(f.ids(), vec!["A", "X", "B", "C"]);

        let mut f = flow(&[("X", ""), ("A", ""), ("B", "")]);
        assert_eq!(f.insert_after(Some(&HechoId::from("B")), h("X", "")), 2);
        assert_eq!(f.ids(), vec!["A", "B", "X"]);
        assert_eq!(f.position(&HechoId::from("X")), Some(2));
    }

    #[test]
    fn insert_without_anchor_goes_first_and_self_anchor_is_stable() {
        let mut f = flow(&[("A", ""), ("B", "")]);
        assert_eq!(f.insert_after(None, h("X", "")), 0);
        assert_eq!(f.insert_after(Some(&HechoId::from("B")), h("B", "")), 2);
        assert_eq!(f.ids(), vec!["X", "A", "B"]);
    }

    #[test]
    fn context_merge_dedups_and_filters_by_day() {
        let mut f = flow(&[("H10", "2025-06-20"), ("H42", "2025-06-28"), ("H7", "2025-06-28")]);
        let added = f.merge_context(
            &HechoId::from("H42"),
            vec![
                h("H42", "2025-06-28"),
                h("H7", "2025-06-28"),
                h("H50", "2025-06-28T10:00:00"),
                h("H51", "2025-06-27"),
                h("H52", "2025-06-28"),
                h("H50", "2025-06-28"),
            ],
            "2025-06-28",
        );
        assert_eq!(added, 2);
        assert_eq!(f.ids(), vec!["H10", "H42", "H50", "H52", "H7"]);

        let mut seen = std::collections::BTreeSet::new();
        assert!(f.items().iter().all(|x| seen.insert(x.id.clone())));
    }

    #[test]
    fn day_drops_time_part() {
        assert_eq!(day_of("2025-06-28T10:00:00"), "2025-06-28");
        assert_eq!(day_of("2025-06-28 10:00"), "2025-06-28");
        assert_eq!(day_of("2025-06-28"), "2025-06-28");
    }

    #[test]
    fn replace_all_drops_duplicates() {
        let f = flow(&[("A", ""), ("B", ""), ("A", "")]);
        assert_eq!(f.ids(), vec!["A", "B"]);
        assert_eq!(f.find(&HechoId::from("B")).map(|x| x.text.as_str()), Some("text B"));
    }
}

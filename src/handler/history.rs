//! Bounded, deduplicating histories.

use std::collections::VecDeque;

/// A most-recent-last history. Pushing an entry that is already present
/// moves it to the end; the oldest entries are dropped beyond `limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History<T> {
    entries: VecDeque<T>,
    limit: usize,
}

impl<T: PartialEq> History<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    pub fn push(&mut self, entry: T) {
        if let Some(pos) = self.entries.iter().position(|e| *e == entry) {
            self.entries.remove(pos);
        }
        self.entries.push_back(entry);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every entry matching `pred`.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) {
        self.entries.retain(|e| !pred(e));
    }
}

/// One handler invocation recorded in the slot history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotCall {
    /// Canonical name of the UI instance.
    pub ui: String,
    pub method: String,
}

impl SlotCall {
    pub fn new(ui: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            ui: ui.into(),
            method: method.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entries<T: Clone + PartialEq>(h: &History<T>) -> Vec<T> {
        h.iter().cloned().collect()
    }

    #[test]
    fn duplicates_move_to_end() {
        let mut h = History::new(10);
        h.push("a");
        h.push("b");
        h.push("a");
        assert_eq!(entries(&h), vec!["b", "a"]);
        assert_eq!(h.last(), Some(&"a"));
    }

    #[test]
    fn bounded_by_limit() {
        let mut h = History::new(3);
        for i in 0..5 {
            h.push(i);
        }
        assert_eq!(entries(&h), vec![2, 3, 4]);
        assert_eq!(h.limit(), 3);
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let mut h = History::new(0);
        h.push(1);
        assert!(h.is_empty());
    }

    #[test]
    fn remove_where_filters() {
        let mut h = History::new(10);
        h.push(SlotCall::new("main", "a"));
        h.push(SlotCall::new("prefs", "b"));
        h.remove_where(|c| c.ui == "main");
        assert_eq!(entries(&h), vec![SlotCall::new("prefs", "b")]);
    }
}

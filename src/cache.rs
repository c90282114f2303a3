//! UI instance cache, owned by the switchboard.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ui::Ui;

/// Memoized UI instances keyed by source identity (canonical UI name).
#[derive(Debug, Default)]
pub struct UiCache {
    entries: HashMap<String, Rc<Ui>>,
    order: Vec<String>,
}

impl UiCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Rc<Ui>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert `ui` under its name. Returns the instance it replaced.
    pub fn insert(&mut self, ui: Rc<Ui>) -> Option<Rc<Ui>> {
        let key = ui.name().to_owned();
        let previous = self.entries.insert(key.clone(), ui);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    /// Evict one instance.
    pub fn remove(&mut self, key: &str) -> Option<Rc<Ui>> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.order.retain(|k| k != key);
        }
        removed
    }

    /// Evict everything, in load order.
    pub fn drain(&mut self) -> Vec<Rc<Ui>> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|k| self.entries.remove(&k))
            .collect()
    }

    /// Cached names in load order.
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    /// Cached instances in load order.
    pub fn values(&self) -> Vec<Rc<Ui>> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! State/settings façade.
//!
//! The engine persists nothing itself. Handlers reach a [`SettingsStore`]
//! through [`Ui::settings`](crate::ui::Ui::settings), which scopes keys to
//! the UI's canonical name.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Opaque key-value storage backend.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory [`SettingsStore`].
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RefCell<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// A [`SettingsStore`] view whose keys are prefixed with `scope/`.
#[derive(Clone)]
pub struct ScopedSettings {
    scope: String,
    store: Rc<dyn SettingsStore>,
}

impl ScopedSettings {
    pub fn new(scope: impl Into<String>, store: Rc<dyn SettingsStore>) -> Self {
        Self {
            scope: scope.into(),
            store,
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}/{}", self.scope, key)
    }

    /// Value for `key`, or `default` when unset.
    pub fn get(&self, key: &str, default: &str) -> String {
        self.store
            .get(&self.key(key))
            .unwrap_or_else(|| default.to_owned())
    }

    pub fn get_opt(&self, key: &str) -> Option<String> {
        self.store.get(&self.key(key))
    }

    pub fn set(&self, key: &str, value: &str) {
        self.store.set(&self.key(key), value);
    }

    pub fn remove(&self, key: &str) {
        self.store.remove(&self.key(key));
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl std::fmt::Debug for ScopedSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedSettings")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let store = MemorySettings::new();
        assert!(store.is_empty());
        store.set("a", "1");
        assert_eq!(store.get("a").as_deref(), Some("1"));
        store.remove("a");
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn scoped_keys_do_not_collide() {
        let store: Rc<MemorySettings> = Rc::new(MemorySettings::new());
        let main = ScopedSettings::new("main", store.clone());
        let prefs = ScopedSettings::new("prefs", store.clone());
        main.set("width", "10");
        prefs.set("width", "20");
        assert_eq!(main.get("width", "0"), "10");
        assert_eq!(prefs.get("width", "0"), "20");
        assert_eq!(store.get("main/width").as_deref(), Some("10"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn scoped_default() {
        let main = ScopedSettings::new("main", Rc::new(MemorySettings::new()));
        assert_eq!(main.get("missing", "fallback"), "fallback");
        assert_eq!(main.get_opt("missing"), None);
        assert_eq!(main.scope(), "main");
    }
}

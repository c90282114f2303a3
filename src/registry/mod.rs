//! Widget registry: the live widgets of one UI instance.
//!
//! Records live in a slotmap arena. Parent/child links are kept in
//! secondary maps; lookups by declared name and by toolkit handle go
//! through plain hash maps. Iteration follows discovery order.

pub mod record;

pub use record::{BindState, WidgetRecord};

use std::collections::{HashMap, HashSet};

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::naming::{resolve, unpack_names};
use crate::toolkit::{LoadError, LoadedTree, WidgetHandle};

new_key_type! {
    /// Key of a widget record within one registry.
    pub struct WidgetKey;
}

const EMPTY_CHILDREN: &[WidgetKey] = &[];

/// Live widgets of one UI instance, keyed by identifier.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    records: SlotMap<WidgetKey, WidgetRecord>,
    order: Vec<WidgetKey>,
    by_name: HashMap<String, WidgetKey>,
    by_handle: HashMap<WidgetHandle, WidgetKey>,
    parent: SecondaryMap<WidgetKey, WidgetKey>,
    children: SecondaryMap<WidgetKey, Vec<WidgetKey>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize the registry of `tree`, loaded from `source`.
    ///
    /// Widgets without a usable name are not registered; named descendants
    /// of an unnamed widget are linked to the nearest named ancestor.
    /// Duplicate names and links that refer to unknown handles or form a
    /// cycle make the source malformed.
    pub fn from_tree(source: &str, tree: &LoadedTree) -> Result<Self, LoadError> {
        let malformed = |reason: String| LoadError::MalformedSource {
            name: source.to_owned(),
            reason,
        };

        let known: HashSet<WidgetHandle> = tree.widgets.iter().map(|w| w.handle).collect();
        if known.len() != tree.widgets.len() {
            return Err(malformed("duplicate widget handle".into()));
        }

        let mut registry = Self::new();
        for widget in &tree.widgets {
            let Ok(identifier) = resolve(&widget.name) else {
                log::trace!("{source}: skipping unnamed {} {}", widget.widget_type, widget.handle);
                continue;
            };
            if registry.by_name.contains_key(identifier.raw()) {
                return Err(malformed(format!("duplicate widget name {:?}", identifier.raw())));
            }
            registry.insert(WidgetRecord::new(identifier, widget.widget_type.clone(), widget.handle));
        }

        let mut parent_of: HashMap<WidgetHandle, WidgetHandle> = HashMap::new();
        for &(parent, child) in &tree.links {
            for handle in [parent, child] {
                if !known.contains(&handle) {
                    return Err(malformed(format!("link refers to unknown widget {handle}")));
                }
            }
            if parent_of.insert(child, parent).is_some_and(|p| p != parent) {
                return Err(malformed(format!("widget {child} has more than one parent")));
            }
        }

        for &start in parent_of.keys() {
            let mut current = start;
            for _ in 0..parent_of.len() {
                match parent_of.get(&current) {
                    Some(&parent) if parent == start => {
                        return Err(malformed(format!("cycle through widget {start}")));
                    }
                    Some(&parent) => current = parent,
                    None => break,
                }
            }
        }

        let keys = registry.order.clone();
        for key in keys {
            let mut current = registry.records[key].handle;
            while let Some(&parent) = parent_of.get(&current) {
                if let Some(&parent_key) = registry.by_handle.get(&parent) {
                    registry.link(parent_key, key);
                    break;
                }
                current = parent;
            }
        }

        Ok(registry)
    }

    fn insert(&mut self, record: WidgetRecord) -> WidgetKey {
        let name = record.name().to_owned();
        let handle = record.handle();
        let key = self.records.insert(record);
        self.children.insert(key, Vec::new());
        self.order.push(key);
        self.by_name.insert(name, key);
        self.by_handle.insert(handle, key);
        key
    }

    fn link(&mut self, parent: WidgetKey, child: WidgetKey) {
        self.parent.insert(child, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(child);
        }
    }

    // -- lookup --------------------------------------------------------------

    /// Key of the widget named `name`. An exact declared name wins; a
    /// bare base name matches the first widget with that base name.
    pub fn key_of(&self, name: &str) -> Option<WidgetKey> {
        let name = name.trim();
        if let Some(&key) = self.by_name.get(name) {
            return Some(key);
        }
        self.order
            .iter()
            .copied()
            .find(|&k| self.records[k].base_name() == name)
    }

    /// The record of the widget named `name`.
    pub fn get(&self, name: &str) -> Option<&WidgetRecord> {
        self.key_of(name).map(|k| &self.records[k])
    }

    pub fn by_key(&self, key: WidgetKey) -> Option<&WidgetRecord> {
        self.records.get(key)
    }

    pub(crate) fn by_key_mut(&mut self, key: WidgetKey) -> Option<&mut WidgetRecord> {
        self.records.get_mut(key)
    }

    /// The record of the widget with toolkit handle `handle`.
    pub fn by_handle(&self, handle: WidgetHandle) -> Option<&WidgetRecord> {
        self.by_handle.get(&handle).map(|&k| &self.records[k])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.key_of(name).is_some()
    }

    // -- iteration -----------------------------------------------------------

    /// Keys in discovery order.
    pub fn keys(&self) -> Vec<WidgetKey> {
        self.order.clone()
    }

    /// Records in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetRecord> {
        self.order.iter().map(|&k| &self.records[k])
    }

    /// Declared names in discovery order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(WidgetRecord::name).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose name matches a pattern such as `"chk000-3, tb001"`.
    /// Each expanded name matches an exact declared name or a base name.
    pub fn matching(&self, pattern: &str) -> Vec<&WidgetRecord> {
        self.matching_keys(pattern)
            .into_iter()
            .map(|k| &self.records[k])
            .collect()
    }

    /// Keys of the records [`matching`](Self::matching) `pattern`, in
    /// discovery order.
    pub fn matching_keys(&self, pattern: &str) -> Vec<WidgetKey> {
        let wanted: HashSet<String> = unpack_names(pattern).into_iter().collect();
        self.order
            .iter()
            .copied()
            .filter(|&k| {
                let r = &self.records[k];
                wanted.contains(r.name()) || wanted.contains(r.base_name())
            })
            .collect()
    }

    /// Records carrying `tag`.
    pub fn tagged(&self, tag: &str) -> Vec<&WidgetRecord> {
        self.iter().filter(|r| r.has_tag(tag)).collect()
    }

    // -- structure -----------------------------------------------------------

    pub fn parent(&self, key: WidgetKey) -> Option<WidgetKey> {
        self.parent.get(key).copied()
    }

    pub fn children(&self, key: WidgetKey) -> &[WidgetKey] {
        self.children
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Records without a registered parent, in discovery order.
    pub fn roots(&self) -> Vec<&WidgetRecord> {
        self.order
            .iter()
            .filter(|&&k| !self.parent.contains_key(k))
            .map(|&k| &self.records[k])
            .collect()
    }

    /// Walk from `key` to the root, nearest ancestor first.
    pub fn ancestors(&self, key: WidgetKey) -> Vec<WidgetKey> {
        let mut out = Vec::new();
        let mut current = key;
        while let Some(p) = self.parent(current) {
            out.push(p);
            current = p;
        }
        out
    }
}

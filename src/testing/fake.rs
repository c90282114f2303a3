//! In-memory toolkit: loader, signal connector and input monitor in one.
//!
//! `FakeToolkit` keeps sources, connections and monitors in plain maps and
//! lets tests emit signals and press mouse buttons. Callbacks are cloned out
//! before they run, so a handler may freely connect or disconnect while being
//! invoked.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::input::{ButtonId, MouseEvent};
use crate::signal::EventValue;
use crate::toolkit::{
    ConnectError, ConnectionId, InputMonitor, LoadError, LoadedTree, MonitorCallback, MonitorId,
    SignalCallback, SignalConnector, UiLoader, WidgetHandle,
};

/// Handles assigned by [`FakeToolkit::add_ui`] start here, away from the
/// small hand-picked handles tests use with `add_source`.
const FIRST_AUTO_HANDLE: u64 = 10_000;

struct Connection {
    widget: WidgetHandle,
    signal: String,
    callback: SignalCallback,
}

/// A headless widget toolkit for tests.
pub struct FakeToolkit {
    sources: RefCell<BTreeMap<String, LoadedTree>>,
    loads: RefCell<HashMap<String, usize>>,
    refused: RefCell<HashSet<String>>,
    connections: RefCell<BTreeMap<u64, Connection>>,
    monitors: RefCell<BTreeMap<u64, (WidgetHandle, MonitorCallback)>>,
    next_id: Cell<u64>,
    next_handle: Cell<u64>,
    installs: Cell<usize>,
    removals: Cell<usize>,
}

impl Default for FakeToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeToolkit {
    pub fn new() -> Self {
        Self {
            sources: RefCell::new(BTreeMap::new()),
            loads: RefCell::new(HashMap::new()),
            refused: RefCell::new(HashSet::new()),
            connections: RefCell::new(BTreeMap::new()),
            monitors: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            next_handle: Cell::new(FIRST_AUTO_HANDLE),
            installs: Cell::new(0),
            removals: Cell::new(0),
        }
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    // -- sources -------------------------------------------------------------

    /// Register `tree` as the source named `name`.
    pub fn add_source(&self, name: &str, tree: LoadedTree) {
        self.sources.borrow_mut().insert(name.to_owned(), tree);
    }

    /// Register a flat source from `(name, type)` pairs. The first widget
    /// becomes the parent of the others. Returns the assigned handles.
    pub fn add_ui(&self, name: &str, widgets: &[(&str, &str)]) -> Vec<WidgetHandle> {
        let mut tree = LoadedTree::new();
        let mut handles = Vec::with_capacity(widgets.len());
        for &(widget, widget_type) in widgets {
            let handle = WidgetHandle(self.next_handle.get());
            self.next_handle.set(handle.0 + 1);
            tree = tree.with_widget(widget, widget_type, handle);
            handles.push(handle);
        }
        if let Some((&root, rest)) = handles.split_first() {
            for &child in rest {
                tree = tree.with_child(root, child);
            }
        }
        self.add_source(name, tree);
        handles
    }

    /// How many times `name` was loaded.
    pub fn load_count(&self, name: &str) -> usize {
        self.loads.borrow().get(name).copied().unwrap_or(0)
    }

    // -- signals -------------------------------------------------------------

    /// Make every later connection to `signal` fail.
    pub fn refuse_signal(&self, signal: &str) {
        self.refused.borrow_mut().insert(signal.to_owned());
    }

    /// Emit `signal` on `widget` with `values`. Returns how many callbacks
    /// ran.
    pub fn emit(&self, widget: WidgetHandle, signal: &str, values: &[EventValue]) -> usize {
        let callbacks: Vec<SignalCallback> = self
            .connections
            .borrow()
            .values()
            .filter(|c| c.widget == widget && c.signal == signal)
            .map(|c| c.callback.clone())
            .collect();
        for callback in &callbacks {
            callback(values);
        }
        callbacks.len()
    }

    /// Live connections across all widgets.
    pub fn connection_count(&self) -> usize {
        self.connections.borrow().len()
    }

    /// Signals connected on `widget`, in connection order.
    pub fn connections(&self, widget: WidgetHandle) -> Vec<String> {
        self.connections
            .borrow()
            .values()
            .filter(|c| c.widget == widget)
            .map(|c| c.signal.clone())
            .collect()
    }

    // -- monitors ------------------------------------------------------------

    /// Installed monitors on `surface`.
    pub fn monitor_count(&self, surface: WidgetHandle) -> usize {
        self.monitors
            .borrow()
            .values()
            .filter(|(s, _)| *s == surface)
            .count()
    }

    /// Total installs so far.
    pub fn install_count(&self) -> usize {
        self.installs.get()
    }

    /// Total removals of live monitors so far.
    pub fn remove_count(&self) -> usize {
        self.removals.get()
    }

    /// Deliver `event` to every monitor on `surface`. Returns whether any
    /// monitor consumed it.
    pub fn dispatch(&self, surface: WidgetHandle, event: &MouseEvent) -> bool {
        let callbacks: Vec<MonitorCallback> = self
            .monitors
            .borrow()
            .values()
            .filter(|(s, _)| *s == surface)
            .map(|(_, cb)| cb.clone())
            .collect();
        let mut consumed = false;
        for callback in callbacks {
            consumed |= callback(event);
        }
        consumed
    }

    /// Press `button` at `(x, y)` on `surface`.
    pub fn press(&self, surface: WidgetHandle, button: ButtonId, x: u16, y: u16) -> bool {
        self.dispatch(surface, &MouseEvent::press(button, x, y))
    }
}

impl UiLoader for FakeToolkit {
    fn load(&self, source: &str) -> Result<LoadedTree, LoadError> {
        let tree = self
            .sources
            .borrow()
            .get(source)
            .cloned()
            .ok_or_else(|| LoadError::SourceNotFound(source.to_owned()))?;
        *self.loads.borrow_mut().entry(source.to_owned()).or_default() += 1;
        Ok(tree)
    }

    fn sources(&self) -> Vec<String> {
        self.sources.borrow().keys().cloned().collect()
    }
}

impl SignalConnector for FakeToolkit {
    fn connect(
        &self,
        widget: WidgetHandle,
        signal: &str,
        callback: SignalCallback,
    ) -> Result<ConnectionId, ConnectError> {
        if self.refused.borrow().contains(signal) {
            return Err(ConnectError::NoSuchSignal {
                widget,
                signal: signal.to_owned(),
            });
        }
        let id = self.next_id();
        self.connections.borrow_mut().insert(
            id,
            Connection {
                widget,
                signal: signal.to_owned(),
                callback,
            },
        );
        Ok(ConnectionId(id))
    }

    fn disconnect(&self, connection: ConnectionId) {
        self.connections.borrow_mut().remove(&connection.0);
    }
}

impl InputMonitor for FakeToolkit {
    fn install_monitor(&self, surface: WidgetHandle, callback: MonitorCallback) -> MonitorId {
        let id = self.next_id();
        self.monitors.borrow_mut().insert(id, (surface, callback));
        self.installs.set(self.installs.get() + 1);
        MonitorId(id)
    }

    fn remove_monitor(&self, monitor: MonitorId) {
        if self.monitors.borrow_mut().remove(&monitor.0).is_some() {
            self.removals.set(self.removals.get() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn load_counts_and_missing_sources() {
        let toolkit = FakeToolkit::new();
        let handles = toolkit.add_ui("main", &[("root", "Widget"), ("ok", "PushButton")]);
        let tree = toolkit.load("main").unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.links, vec![(handles[0], handles[1])]);
        assert_eq!(toolkit.load_count("main"), 1);
        assert!(toolkit.load("other").is_err());
        assert_eq!(toolkit.load_count("other"), 0);
        assert_eq!(toolkit.sources(), vec!["main"]);
    }

    #[test]
    fn emit_reaches_matching_connections() {
        let toolkit = FakeToolkit::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = toolkit
            .connect(WidgetHandle(1), "clicked", Rc::new(move |_| h.set(h.get() + 1)))
            .unwrap();
        assert_eq!(toolkit.emit(WidgetHandle(1), "clicked", &[]), 1);
        assert_eq!(toolkit.emit(WidgetHandle(1), "toggled", &[]), 0);
        assert_eq!(toolkit.connections(WidgetHandle(1)), vec!["clicked"]);
        toolkit.disconnect(id);
        assert_eq!(toolkit.emit(WidgetHandle(1), "clicked", &[]), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn refused_signal_fails_to_connect() {
        let toolkit = FakeToolkit::new();
        toolkit.refuse_signal("clicked");
        let err = toolkit
            .connect(WidgetHandle(1), "clicked", Rc::new(|_| {}))
            .unwrap_err();
        assert!(matches!(err, ConnectError::NoSuchSignal { .. }));
    }

    #[test]
    fn monitors_count_installs_and_removals() {
        let toolkit = FakeToolkit::new();
        let id = toolkit.install_monitor(WidgetHandle(3), Rc::new(|e| e.pressed().is_some()));
        assert_eq!(toolkit.monitor_count(WidgetHandle(3)), 1);
        assert!(toolkit.press(WidgetHandle(3), ButtonId::Left, 0, 0));
        assert!(!toolkit.press(WidgetHandle(4), ButtonId::Left, 0, 0));
        toolkit.remove_monitor(id);
        toolkit.remove_monitor(id);
        assert_eq!(toolkit.install_count(), 1);
        assert_eq!(toolkit.remove_count(), 1);
    }
}

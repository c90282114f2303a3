//! The top-level orchestrator.
//!
//! A [`Switchboard`] owns the collaborators, the signal policy, the handler
//! class registry and the UI instance cache. UIs are loaded, registered and
//! bound lazily on first access by name:
//!
//! 1. the name is parsed into an [`Identifier`];
//! 2. a cached instance is returned if there is one;
//! 3. otherwise the loader materializes the source, the registry is built
//!    and the instance is cached; only then is the handler class
//!    instantiated (its constructor may call back in) and the widgets bound.
//!
//! `Switchboard` is a cheap handle (`Rc` inside). Handler instances that
//! want to keep it should store a [`WeakSwitchboard`], since the switchboard
//! transitively owns them.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::binding::{bind_slot, bind_ui, bind_widgets, disconnect_ui, disconnect_widgets, BindReport};
use crate::cache::UiCache;
use crate::config::SwitchboardConfig;
use crate::error::{Error, Result};
use crate::handler::{HandlerClass, HandlerRegistry, Handlers, History, SlotCall};
use crate::naming::{resolve, Identifier};
use crate::registry::WidgetRegistry;
use crate::settings::{MemorySettings, SettingsStore};
use crate::signal::SignalPolicy;
use crate::toolkit::{InputMonitor, LoadedTree, SignalConnector, UiLoader};
use crate::ui::Ui;

/// How two UIs are related by hierarchy path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Strict ancestors (`main` for `main.file_menu`).
    Upstream,
    /// Strict descendants.
    Downstream,
    /// Same hierarchy path, any tags (`main#startmenu` for `main`).
    Exact,
    /// Any of the above.
    Any,
}

impl Relation {
    fn matches(self, candidate: &Identifier, target: &Identifier) -> bool {
        let exact = candidate.hierarchy_path() == target.hierarchy_path();
        match self {
            Relation::Upstream => target.is_descendant_of(candidate),
            Relation::Downstream => candidate.is_descendant_of(target),
            Relation::Exact => exact,
            Relation::Any => {
                exact || target.is_descendant_of(candidate) || candidate.is_descendant_of(target)
            }
        }
    }
}

struct Inner {
    config: SwitchboardConfig,
    policy: SignalPolicy,
    handlers: RefCell<HandlerRegistry>,
    loader: Rc<dyn UiLoader>,
    connector: Rc<dyn SignalConnector>,
    monitor: Rc<dyn InputMonitor>,
    settings: Rc<dyn SettingsStore>,
    cache: RefCell<UiCache>,
    slot_history: RefCell<History<SlotCall>>,
    ui_history: RefCell<History<String>>,
}

/// The binding orchestrator. Cloning shares the same switchboard.
#[derive(Clone)]
pub struct Switchboard {
    inner: Rc<Inner>,
}

/// Non-owning handle to a [`Switchboard`].
#[derive(Clone)]
pub struct WeakSwitchboard {
    inner: Weak<Inner>,
}

impl WeakSwitchboard {
    pub fn upgrade(&self) -> Option<Switchboard> {
        self.inner.upgrade().map(|inner| Switchboard { inner })
    }
}

impl fmt::Debug for WeakSwitchboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakSwitchboard")
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for a [`Switchboard`].
#[derive(Default)]
pub struct SwitchboardBuilder {
    config: SwitchboardConfig,
    policy: Option<SignalPolicy>,
    handlers: HandlerRegistry,
    loader: Option<Rc<dyn UiLoader>>,
    connector: Option<Rc<dyn SignalConnector>>,
    monitor: Option<Rc<dyn InputMonitor>>,
    settings: Option<Rc<dyn SettingsStore>>,
}

impl SwitchboardBuilder {
    pub fn config(mut self, config: SwitchboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Signal policy table. Defaults to [`SignalPolicy::standard`].
    pub fn policy(mut self, policy: SignalPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Replace the handler class registry.
    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Register one handler class.
    pub fn register(mut self, class: HandlerClass) -> Self {
        self.handlers.register(class);
        self
    }

    /// Register the class generated for `T` by `#[handlers]`.
    pub fn register_type<T: Handlers>(mut self) -> Self {
        self.handlers.register_type::<T>();
        self
    }

    pub fn loader(mut self, loader: Rc<dyn UiLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn connector(mut self, connector: Rc<dyn SignalConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn monitor(mut self, monitor: Rc<dyn InputMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Use one toolkit object as loader, connector and input monitor.
    pub fn toolkit<T>(self, toolkit: Rc<T>) -> Self
    where
        T: UiLoader + SignalConnector + InputMonitor + 'static,
    {
        self.loader(toolkit.clone())
            .connector(toolkit.clone())
            .monitor(toolkit)
    }

    /// Settings backend. Defaults to an in-memory store.
    pub fn settings(mut self, settings: Rc<dyn SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the switchboard. With `preload_ui` set, every source the
    /// loader lists is loaded and bound before this returns.
    pub fn build(self) -> Result<Switchboard> {
        let loader = self.loader.ok_or(Error::MissingCollaborator("loader"))?;
        let connector = self
            .connector
            .ok_or(Error::MissingCollaborator("signal connector"))?;
        let monitor = self
            .monitor
            .ok_or(Error::MissingCollaborator("input monitor"))?;
        let settings = self
            .settings
            .unwrap_or_else(|| Rc::new(MemorySettings::new()));
        let sb = Switchboard {
            inner: Rc::new(Inner {
                slot_history: RefCell::new(History::new(self.config.slot_history_limit)),
                ui_history: RefCell::new(History::new(self.config.ui_history_limit)),
                config: self.config,
                policy: self.policy.unwrap_or_else(SignalPolicy::standard),
                handlers: RefCell::new(self.handlers),
                loader,
                connector,
                monitor,
                settings,
                cache: RefCell::new(UiCache::new()),
            }),
        };
        if sb.config().preload_ui {
            sb.preload()?;
        }
        Ok(sb)
    }
}

// ---------------------------------------------------------------------------
// Switchboard
// ---------------------------------------------------------------------------

impl Switchboard {
    pub fn builder() -> SwitchboardBuilder {
        SwitchboardBuilder::default()
    }

    pub fn downgrade(&self) -> WeakSwitchboard {
        WeakSwitchboard {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn config(&self) -> &SwitchboardConfig {
        &self.inner.config
    }

    pub fn policy(&self) -> &SignalPolicy {
        &self.inner.policy
    }

    pub fn connector(&self) -> &Rc<dyn SignalConnector> {
        &self.inner.connector
    }

    pub fn loader(&self) -> &Rc<dyn UiLoader> {
        &self.inner.loader
    }

    pub fn monitor(&self) -> &Rc<dyn InputMonitor> {
        &self.inner.monitor
    }

    pub fn handlers(&self) -> Ref<'_, HandlerRegistry> {
        self.inner.handlers.borrow()
    }

    /// Register a handler class after construction. UIs already loaded keep
    /// the class they were bound with.
    pub fn register(&self, class: HandlerClass) -> Option<Rc<HandlerClass>> {
        self.inner.handlers.borrow_mut().register(class)
    }

    // -- UI access -----------------------------------------------------------

    /// The UI instance named `name`, loading and binding it on first access.
    pub fn get_ui(&self, name: &str) -> Result<Rc<Ui>> {
        let identifier = resolve(name)?;
        let key = identifier.canonical();
        if let Some(ui) = self.inner.cache.borrow().get(&key) {
            self.inner.ui_history.borrow_mut().push(key);
            return Ok(ui);
        }
        let tree = self.inner.loader.load(&key)?;
        self.materialize(identifier, &tree)
    }

    /// Bind an already-loaded tree under `name`, replacing any cached
    /// instance of that name.
    pub fn bind_tree(&self, name: &str, tree: &LoadedTree) -> Result<Rc<Ui>> {
        let identifier = resolve(name)?;
        if let Some(old) = self.inner.cache.borrow().get(&identifier.canonical()) {
            self.release(&old);
        }
        self.materialize(identifier, tree)
    }

    fn materialize(&self, identifier: Identifier, tree: &LoadedTree) -> Result<Rc<Ui>> {
        let key = identifier.canonical();
        let registry = WidgetRegistry::from_tree(&key, tree)?;
        let class = self
            .inner
            .handlers
            .borrow()
            .resolve(&identifier, &self.config().class_suffix);
        let ui = Rc::new(Ui::new(
            identifier,
            registry,
            Rc::clone(&self.inner.monitor),
            Rc::clone(&self.inner.settings),
        ));
        // Cached before the handler exists: its constructor may look this UI up.
        self.inner.cache.borrow_mut().insert(Rc::clone(&ui));
        self.inner.ui_history.borrow_mut().push(key.clone());
        if let Some(class) = class {
            ui.install_handler(class.instantiate(self));
        }
        log::debug!(
            "loaded UI {key}: {} widget(s), handler class {:?}",
            ui.registry().len(),
            ui.handler_class_name()
        );
        bind_ui(self, &ui);
        Ok(ui)
    }

    /// The cached instance named `name`, without loading.
    pub fn loaded_ui(&self, name: &str) -> Option<Rc<Ui>> {
        let key = resolve(name).ok()?.canonical();
        self.inner.cache.borrow().get(&key)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded_ui(name).is_some()
    }

    /// Cached instances in load order.
    pub fn loaded_uis(&self) -> Vec<Rc<Ui>> {
        self.inner.cache.borrow().values()
    }

    /// Load and bind every source the loader lists. Returns how many were
    /// newly loaded.
    pub fn preload(&self) -> Result<usize> {
        let mut loaded = 0;
        for source in self.inner.loader.sources() {
            if !self.is_loaded(&source) {
                self.get_ui(&source)?;
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    // -- connections ---------------------------------------------------------

    /// Bind every widget of `ui` that is not connected.
    pub fn connect(&self, ui: &Rc<Ui>) -> BindReport {
        bind_ui(self, ui)
    }

    /// Remove every connection made for `ui`.
    pub fn disconnect(&self, ui: &Ui) -> usize {
        disconnect_ui(self, ui)
    }

    /// Bind the widgets of `ui` matching `pattern` (`"chk000-3, save_btn"`)
    /// that are not connected.
    pub fn connect_widgets(&self, ui: &Rc<Ui>, pattern: &str) -> BindReport {
        bind_widgets(self, ui, pattern)
    }

    /// Remove the connections of the widgets of `ui` matching `pattern`.
    pub fn disconnect_widgets(&self, ui: &Ui, pattern: &str) -> usize {
        disconnect_widgets(self, ui, pattern)
    }

    /// Rebind the widget `widget` of `ui` to the handler method `slot`, or
    /// to the method named after its base name when `slot` is `None`.
    ///
    /// A slot the handler does not have is recorded on the widget like any
    /// other configuration failure.
    pub fn connect_slot(&self, ui: &Rc<Ui>, widget: &str, slot: Option<&str>) -> Result<BindReport> {
        let key = ui.registry().key_of(widget);
        let Some(key) = key else {
            return Err(Error::UnknownWidget {
                ui: ui.name().to_owned(),
                widget: widget.to_owned(),
            });
        };
        Ok(bind_slot(self, ui, key, slot))
    }

    /// Disconnect `name`, clear its menus and evict it from the cache.
    /// Returns whether an instance was cached.
    pub fn teardown(&self, name: &str) -> Result<bool> {
        let key = resolve(name)?.canonical();
        let removed = self.inner.cache.borrow_mut().remove(&key);
        match removed {
            Some(ui) => {
                self.release(&ui);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Tear down every cached instance. Returns how many there were.
    pub fn teardown_all(&self) -> usize {
        let uis = self.inner.cache.borrow_mut().drain();
        for ui in &uis {
            self.release(ui);
        }
        uis.len()
    }

    fn release(&self, ui: &Ui) {
        ui.mark_released();
        disconnect_ui(self, ui);
        ui.clear_menus();
        self.inner
            .ui_history
            .borrow_mut()
            .remove_where(|name| name == ui.name());
        log::debug!("tore down UI {}", ui.name());
    }

    // -- histories -----------------------------------------------------------

    pub(crate) fn record_slot(&self, call: SlotCall) {
        self.inner.slot_history.borrow_mut().push(call);
    }

    /// Handler invocations, oldest first; each `(ui, method)` appears once.
    pub fn slot_history(&self) -> Vec<SlotCall> {
        self.inner.slot_history.borrow().iter().cloned().collect()
    }

    /// The most recent handler invocation.
    pub fn last_slot(&self) -> Option<SlotCall> {
        self.inner.slot_history.borrow().last().cloned()
    }

    /// Accessed UI names, oldest first.
    pub fn ui_history(&self) -> Vec<String> {
        self.inner.ui_history.borrow().iter().cloned().collect()
    }

    /// The most recently accessed UI that is still loaded.
    pub fn current_ui(&self) -> Option<Rc<Ui>> {
        let history = self.inner.ui_history.borrow();
        let cache = self.inner.cache.borrow();
        let current = history.iter().rev().find_map(|name| cache.get(name));
        current
    }

    /// Make `ui` the current UI.
    pub fn set_current_ui(&self, ui: &Ui) {
        self.inner.ui_history.borrow_mut().push(ui.name().to_owned());
    }

    /// Names of the sources related to `name`, sorted. Candidates are the
    /// loader's sources plus every loaded UI; `name` itself is excluded.
    pub fn ui_relatives(&self, name: &str, relation: Relation) -> Result<Vec<String>> {
        let target = resolve(name)?;
        let mut candidates: Vec<String> = self.inner.loader.sources();
        candidates.extend(self.inner.cache.borrow().keys().iter().cloned());

        let mut out: Vec<String> = candidates
            .iter()
            .filter_map(|c| resolve(c).ok())
            .filter(|c| c.canonical() != target.canonical())
            .filter(|c| relation.matches(c, &target))
            .map(|c| c.canonical())
            .collect();
        out.sort();
        out.dedup();
        Ok(out)
    }
}

impl fmt::Debug for Switchboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switchboard")
            .field("config", &self.inner.config)
            .field("loaded", &self.inner.cache.borrow().keys())
            .finish_non_exhaustive()
    }
}

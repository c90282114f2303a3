//! A materialized UI instance.
//!
//! A [`Ui`] aggregates the widget registry of one loaded source, the handler
//! instance matched to it, its cached call plans and its menus. It is created
//! by the [`Switchboard`](crate::Switchboard) on first access and lives until
//! it is torn down.

use std::cell::{Cell, OnceCell, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::binding::BindReport;
use crate::handler::{HandlerInstance, PlanCache};
use crate::menu::{Menu, MenuConfig};
use crate::naming::Identifier;
use crate::registry::{WidgetRecord, WidgetRegistry};
use crate::settings::{ScopedSettings, SettingsStore};
use crate::toolkit::{InputMonitor, WidgetHandle};

/// One UI instance.
pub struct Ui {
    identifier: Identifier,
    name: String,
    registry: RefCell<WidgetRegistry>,
    handler: OnceCell<HandlerInstance>,
    released: Cell<bool>,
    pub(crate) plans: RefCell<PlanCache>,
    pub(crate) last_report: RefCell<BindReport>,
    menus: RefCell<HashMap<String, Menu>>,
    monitor: Rc<dyn InputMonitor>,
    settings: Rc<dyn SettingsStore>,
}

impl Ui {
    pub(crate) fn new(
        identifier: Identifier,
        registry: WidgetRegistry,
        monitor: Rc<dyn InputMonitor>,
        settings: Rc<dyn SettingsStore>,
    ) -> Self {
        let name = identifier.canonical();
        Self {
            last_report: RefCell::new(BindReport::new(name.clone())),
            identifier,
            name,
            registry: RefCell::new(registry),
            handler: OnceCell::new(),
            released: Cell::new(false),
            plans: RefCell::new(PlanCache::new()),
            menus: RefCell::new(HashMap::new()),
            monitor,
            settings,
        }
    }

    /// Canonical name: hierarchy path plus sorted tags. Also the cache key.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Whether this UI lies below `other` in the hierarchy.
    pub fn is_descendant_of(&self, other: &Ui) -> bool {
        self.identifier.is_descendant_of(&other.identifier)
    }

    // -- widgets -------------------------------------------------------------

    pub fn registry(&self) -> Ref<'_, WidgetRegistry> {
        self.registry.borrow()
    }

    pub(crate) fn registry_mut(&self) -> RefMut<'_, WidgetRegistry> {
        self.registry.borrow_mut()
    }

    /// A copy of the record of the widget named `name`.
    pub fn widget(&self, name: &str) -> Option<WidgetRecord> {
        self.registry.borrow().get(name).cloned()
    }

    /// Toolkit handle of the widget named `name`.
    pub fn handle_of(&self, name: &str) -> Option<WidgetHandle> {
        self.registry.borrow().get(name).map(WidgetRecord::handle)
    }

    /// Declared widget names in discovery order.
    pub fn widget_names(&self) -> Vec<String> {
        self.registry
            .borrow()
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Records matching a name pattern such as `"chk000-3, tb001"`.
    pub fn widgets_matching(&self, pattern: &str) -> Vec<WidgetRecord> {
        self.registry
            .borrow()
            .matching(pattern)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Records carrying `tag`.
    pub fn widgets_tagged(&self, tag: &str) -> Vec<WidgetRecord> {
        self.registry
            .borrow()
            .tagged(tag)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of widgets connected to a handler.
    pub fn connected_count(&self) -> usize {
        self.registry
            .borrow()
            .iter()
            .filter(|r| r.is_connected())
            .count()
    }

    /// Records bound to the handler method `method`.
    pub fn widgets_for_method(&self, method: &str) -> Vec<WidgetRecord> {
        self.registry
            .borrow()
            .iter()
            .filter(|r| r.handler_ref().is_some_and(|m| m.name() == method))
            .cloned()
            .collect()
    }

    // -- handler -------------------------------------------------------------

    /// The handler instance, or `None` when the UI has no handler class or
    /// its constructor is still running.
    pub fn handler(&self) -> Option<&HandlerInstance> {
        self.handler.get()
    }

    pub fn handler_class_name(&self) -> Option<&str> {
        self.handler.get().map(|h| h.class().name())
    }

    /// Borrow the handler instance as `T`.
    pub fn with_handler<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.handler.get()?.with(f)
    }

    /// Attach the handler instance. Only the first call takes effect.
    pub(crate) fn install_handler(&self, handler: HandlerInstance) -> bool {
        self.handler.set(handler).is_ok()
    }

    /// Whether the UI was torn down. A released UI is never bound again.
    pub fn is_released(&self) -> bool {
        self.released.get()
    }

    pub(crate) fn mark_released(&self) {
        self.released.set(true);
    }

    /// Report of the most recent bind pass.
    pub fn last_report(&self) -> BindReport {
        self.last_report.borrow().clone()
    }

    /// Number of cached call plans.
    pub fn plan_count(&self) -> usize {
        self.plans.borrow().len()
    }

    // -- menus ---------------------------------------------------------------

    /// The context menu of the widget named `widget`, created on first use.
    /// `None` when there is no such widget.
    pub fn menu(&self, widget: &str) -> Option<Menu> {
        let record = self.widget(widget)?;
        let mut menus = self.menus.borrow_mut();
        let menu = menus.entry(record.name().to_owned()).or_insert_with(|| {
            log::debug!("UI {}: creating context menu for {}", self.name, record.name());
            Menu::new(
                record.handle(),
                MenuConfig::for_context_menu().with_name(record.name()),
                Rc::clone(&self.monitor),
            )
        });
        Some(menu.clone())
    }

    /// Menus created so far, keyed by widget name.
    pub fn menus(&self) -> Vec<(String, Menu)> {
        let mut menus: Vec<(String, Menu)> = self
            .menus
            .borrow()
            .iter()
            .map(|(k, m)| (k.clone(), m.clone()))
            .collect();
        menus.sort_by(|a, b| a.0.cmp(&b.0));
        menus
    }

    /// Clear every menu (removing their input monitors) and forget them.
    pub fn clear_menus(&self) {
        let menus: Vec<Menu> = self.menus.borrow_mut().drain().map(|(_, m)| m).collect();
        for menu in menus {
            menu.clear();
        }
    }

    // -- settings ------------------------------------------------------------

    /// Settings scoped to this UI's canonical name.
    pub fn settings(&self) -> ScopedSettings {
        ScopedSettings::new(self.name.clone(), Rc::clone(&self.settings))
    }
}

impl fmt::Debug for Ui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ui")
            .field("name", &self.name)
            .field("widgets", &self.registry.borrow().len())
            .field("handler", &self.handler_class_name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ButtonId;
    use crate::naming::resolve;
    use crate::settings::MemorySettings;
    use crate::testing::FakeToolkit;
    use crate::toolkit::LoadedTree;

    fn ui(toolkit: &Rc<FakeToolkit>) -> Ui {
        let tree = LoadedTree::new()
            .with_widget("main_window", "MainWindow", WidgetHandle(1))
            .with_widget("chk000#opt", "CheckBox", WidgetHandle(2))
            .with_widget("chk001", "CheckBox", WidgetHandle(3))
            .with_child(WidgetHandle(1), WidgetHandle(2))
            .with_child(WidgetHandle(1), WidgetHandle(3));
        Ui::new(
            resolve("main#startmenu").unwrap(),
            WidgetRegistry::from_tree("main", &tree).unwrap(),
            toolkit.clone(),
            Rc::new(MemorySettings::new()),
        )
    }

    // ── Widgets ──────────────────────────────────────────────────────

    #[test]
    fn name_is_canonical() {
        let toolkit = Rc::new(FakeToolkit::new());
        let ui = ui(&toolkit);
        assert_eq!(ui.name(), "main#startmenu");
        assert!(ui.handler().is_none());
        assert_eq!(ui.handler_class_name(), None);
        assert!(!ui.is_released());
    }

    #[test]
    fn widget_queries() {
        let toolkit = Rc::new(FakeToolkit::new());
        let ui = ui(&toolkit);
        assert_eq!(ui.widget_names(), vec!["main_window", "chk000#opt", "chk001"]);
        assert_eq!(ui.handle_of("chk001"), Some(WidgetHandle(3)));
        assert_eq!(ui.widgets_matching("chk000-1").len(), 2);
        assert_eq!(ui.widgets_tagged("opt").len(), 1);
        assert_eq!(ui.connected_count(), 0);
        assert!(ui.widget("nope").is_none());
    }

    // ── Menus ────────────────────────────────────────────────────────

    #[test]
    fn menu_is_created_once() {
        let toolkit = Rc::new(FakeToolkit::new());
        let ui = ui(&toolkit);
        let menu = ui.menu("chk001").unwrap();
        menu.add_item("Reset");
        let again = ui.menu("chk001").unwrap();
        assert_eq!(again.items(), vec!["Reset".to_owned()]);
        assert_eq!(again.anchor(), WidgetHandle(3));
        assert_eq!(ui.menus().len(), 1);
        assert!(ui.menu("missing").is_none());
    }

    #[test]
    fn context_menu_opens_on_right_press() {
        let toolkit = Rc::new(FakeToolkit::new());
        let ui = ui(&toolkit);
        let menu = ui.menu("chk001").unwrap();
        menu.add_item("Reset");
        assert!(toolkit.press(WidgetHandle(3), ButtonId::Right, 0, 0));
        assert!(menu.is_visible());
    }

    #[test]
    fn clear_menus_removes_monitors() {
        let toolkit = Rc::new(FakeToolkit::new());
        let ui = ui(&toolkit);
        let menu = ui.menu("chk001").unwrap();
        menu.add_item("Reset");
        assert_eq!(toolkit.monitor_count(WidgetHandle(3)), 1);
        ui.clear_menus();
        assert_eq!(toolkit.monitor_count(WidgetHandle(3)), 0);
        assert!(ui.menus().is_empty());
    }

    // ── Settings ─────────────────────────────────────────────────────

    #[test]
    fn settings_are_scoped() {
        let toolkit = Rc::new(FakeToolkit::new());
        let ui = ui(&toolkit);
        ui.settings().set("geometry", "10x20");
        assert_eq!(ui.settings().get("geometry", ""), "10x20");
        assert_eq!(ui.settings().scope(), "main#startmenu");
    }
}

//! Menu surfaces: trigger resolution and monitor lifecycle.
//!
//! A [`Menu`] is anchored on a widget. It owns its items, a [`Trigger`]
//! deciding which buttons open it, and a [`MonitorLifecycle`] that keeps an
//! input monitor installed on the anchor only while the menu has items.
//! Mouse presses seen by that monitor and programmatic calls to
//! [`Menu::trigger`] both go through [`Trigger::should_trigger`].

pub mod monitor;
pub mod trigger;

pub use monitor::MonitorLifecycle;
pub use trigger::{Trigger, TriggerMode, UnknownTriggerMode};

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::input::{ButtonId, ButtonSet, MouseEvent};
use crate::toolkit::{InputMonitor, MonitorCallback, WidgetHandle};

// ---------------------------------------------------------------------------
// MenuConfig
// ---------------------------------------------------------------------------

/// Where a shown menu is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuPosition {
    /// At the pointer position of the triggering press.
    #[default]
    Cursor,
    /// Below the anchor widget.
    Bottom,
    Top,
    Center,
}

/// Construction-time menu settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuConfig {
    pub name: Option<String>,
    /// Trigger mode name (`left`, `right`, `middle`, `none`). `None` means
    /// not configured and resolves to [`TriggerMode::SAFE_DEFAULT`].
    pub trigger: Option<String>,
    pub position: MenuPosition,
    /// Hide when the pointer leaves the menu.
    pub hide_on_leave: bool,
}

impl MenuConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opened with the right button at the pointer.
    pub fn for_context_menu() -> Self {
        Self {
            trigger: Some("right".into()),
            ..Self::default()
        }
    }

    /// Opened by its owner widget, placed below it.
    pub fn for_dropdown_menu() -> Self {
        Self {
            trigger: Some(trigger::NONE_MODE.into()),
            position: MenuPosition::Bottom,
            hide_on_leave: true,
            ..Self::default()
        }
    }

    /// Opened programmatically at the pointer.
    pub fn for_popup_menu() -> Self {
        Self {
            trigger: Some(trigger::NONE_MODE.into()),
            ..Self::default()
        }
    }

    /// Set the name (builder).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the trigger mode name (builder).
    pub fn with_trigger(mut self, mode: impl Into<String>) -> Self {
        self.trigger = Some(mode.into());
        self
    }

    /// Set the placement (builder).
    pub fn with_position(mut self, position: MenuPosition) -> Self {
        self.position = position;
        self
    }

    /// Set hide-on-leave (builder).
    pub fn with_hide_on_leave(mut self, hide: bool) -> Self {
        self.hide_on_leave = hide;
        self
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

struct MenuState {
    items: Vec<String>,
    trigger: Trigger,
    lifecycle: MonitorLifecycle,
    visible: bool,
    shown_at: Option<(u16, u16)>,
}

struct MenuInner {
    config: MenuConfig,
    anchor: WidgetHandle,
    state: RefCell<MenuState>,
}

/// A menu surface anchored on a widget. Cloning shares the menu.
#[derive(Clone)]
pub struct Menu {
    inner: Rc<MenuInner>,
}

impl Menu {
    /// Create an empty, hidden menu anchored on `anchor`. No monitor is
    /// installed until the first item is added.
    pub fn new(anchor: WidgetHandle, config: MenuConfig, monitor: Rc<dyn InputMonitor>) -> Self {
        let trigger = Trigger::from_config(config.trigger.as_deref());
        let inner = Rc::new_cyclic(|weak: &Weak<MenuInner>| {
            let weak = weak.clone();
            let callback: MonitorCallback = Rc::new(move |event: &MouseEvent| {
                match weak.upgrade() {
                    Some(inner) => Menu { inner }.on_mouse(event),
                    None => false,
                }
            });
            MenuInner {
                config,
                anchor,
                state: RefCell::new(MenuState {
                    items: Vec::new(),
                    trigger,
                    lifecycle: MonitorLifecycle::new(anchor, monitor, callback),
                    visible: false,
                    shown_at: None,
                }),
            }
        });
        Menu { inner }
    }

    pub fn anchor(&self) -> WidgetHandle {
        self.inner.anchor
    }

    pub fn config(&self) -> &MenuConfig {
        &self.inner.config
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.config.name.as_deref()
    }

    // -- items ---------------------------------------------------------------

    /// Append an item. Returns its index.
    pub fn add_item(&self, text: impl Into<String>) -> usize {
        let mut state = self.inner.state.borrow_mut();
        state.items.push(text.into());
        state.lifecycle.on_item_added();
        state.items.len() - 1
    }

    /// Remove the first item with `text`. Returns whether one was removed.
    pub fn remove_item(&self, text: &str) -> bool {
        let mut state = self.inner.state.borrow_mut();
        let Some(pos) = state.items.iter().position(|i| i == text) else {
            return false;
        };
        state.items.remove(pos);
        state.lifecycle.on_item_removed();
        if state.items.is_empty() {
            state.visible = false;
        }
        true
    }

    /// Remove every item and hide.
    pub fn clear(&self) {
        let mut state = self.inner.state.borrow_mut();
        state.items.clear();
        state.lifecycle.on_cleared();
        state.visible = false;
    }

    pub fn items(&self) -> Vec<String> {
        self.inner.state.borrow().items.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, text: &str) -> bool {
        self.inner.state.borrow().items.iter().any(|i| i == text)
    }

    /// Whether the input monitor is installed on the anchor.
    pub fn is_monitoring(&self) -> bool {
        self.inner.state.borrow().lifecycle.is_installed()
    }

    // -- trigger -------------------------------------------------------------

    pub fn trigger_state(&self) -> Trigger {
        self.inner.state.borrow().trigger
    }

    pub fn mode(&self) -> Option<TriggerMode> {
        self.inner.state.borrow().trigger.mode()
    }

    /// Set the trigger mode by name. See [`Trigger::set_mode_name`].
    pub fn set_mode(&self, name: &str) {
        self.inner.state.borrow_mut().trigger.set_mode_name(name);
    }

    pub fn buttons(&self) -> Option<ButtonSet> {
        self.inner.state.borrow().trigger.buttons()
    }

    /// Set the activating buttons. See [`Trigger::set_buttons`].
    pub fn set_buttons(&self, buttons: Option<ButtonSet>) {
        self.inner.state.borrow_mut().trigger.set_buttons(buttons);
    }

    pub fn should_trigger(&self, button: ButtonId) -> bool {
        self.inner.state.borrow().trigger.should_trigger(button)
    }

    /// Programmatic activation with `button`. Shows the menu when the
    /// trigger accepts the button and the menu has items.
    pub fn trigger(&self, button: ButtonId) -> bool {
        self.activate(button, None)
    }

    fn on_mouse(&self, event: &MouseEvent) -> bool {
        match event.pressed() {
            Some(button) => self.activate(button, Some((event.x, event.y))),
            None => false,
        }
    }

    fn activate(&self, button: ButtonId, at: Option<(u16, u16)>) -> bool {
        if !self.should_trigger(button) || self.is_empty() {
            return false;
        }
        log::debug!(
            "menu {:?} on {} triggered by {button}",
            self.name().unwrap_or(""),
            self.anchor()
        );
        self.show_at(at);
        true
    }

    // -- visibility ----------------------------------------------------------

    pub fn show(&self) {
        self.show_at(None);
    }

    fn show_at(&self, at: Option<(u16, u16)>) {
        let mut state = self.inner.state.borrow_mut();
        state.visible = true;
        state.shown_at = match self.inner.config.position {
            MenuPosition::Cursor => at,
            _ => None,
        };
    }

    pub fn hide(&self) {
        let mut state = self.inner.state.borrow_mut();
        state.visible = false;
        state.shown_at = None;
    }

    pub fn is_visible(&self) -> bool {
        self.inner.state.borrow().visible
    }

    /// Pointer position the menu was last shown at, for cursor-placed
    /// menus opened by a mouse press.
    pub fn shown_at(&self) -> Option<(u16, u16)> {
        self.inner.state.borrow().shown_at
    }

    /// The pointer left the menu.
    pub fn on_leave(&self) {
        if self.inner.config.hide_on_leave {
            self.hide();
        }
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Menu")
            .field("anchor", &self.inner.anchor)
            .field("items", &state.items)
            .field("trigger", &state.trigger)
            .field("visible", &state.visible)
            .finish()
    }
}

//! Input monitor lifecycle for menu surfaces.
//!
//! A monitor sees every low-level mouse event on its surface, so it is only
//! installed while the surface has interactive items. The lifecycle keeps
//! `installed == (items > 0)` after every operation; a divergence is an
//! internal defect and trips a debug assertion.

use std::fmt;
use std::rc::Rc;

use crate::toolkit::{InputMonitor, MonitorCallback, MonitorId, WidgetHandle};

/// Installs and removes one surface's input monitor as items come and go.
pub struct MonitorLifecycle {
    surface: WidgetHandle,
    monitor: Rc<dyn InputMonitor>,
    callback: MonitorCallback,
    installed: Option<MonitorId>,
    items: usize,
}

impl MonitorLifecycle {
    /// A lifecycle for `surface` with nothing installed.
    pub fn new(surface: WidgetHandle, monitor: Rc<dyn InputMonitor>, callback: MonitorCallback) -> Self {
        Self {
            surface,
            monitor,
            callback,
            installed: None,
            items: 0,
        }
    }

    pub fn surface(&self) -> WidgetHandle {
        self.surface
    }

    pub fn is_installed(&self) -> bool {
        self.installed.is_some()
    }

    /// Number of interactive items currently tracked.
    pub fn item_count(&self) -> usize {
        self.items
    }

    /// An item was added to the surface. Installs on the first item.
    pub fn on_item_added(&mut self) {
        self.items += 1;
        if self.items == 1 {
            self.install();
        }
        self.check();
    }

    /// An item was removed. Uninstalls when the surface becomes empty.
    pub fn on_item_removed(&mut self) {
        self.items = self.items.saturating_sub(1);
        if self.items == 0 {
            self.uninstall();
        }
        self.check();
    }

    /// Every item was removed.
    pub fn on_cleared(&mut self) {
        self.items = 0;
        self.uninstall();
        self.check();
    }

    /// Install the monitor. No-op when already installed.
    fn install(&mut self) {
        if self.installed.is_some() {
            return;
        }
        let id = self
            .monitor
            .install_monitor(self.surface, Rc::clone(&self.callback));
        log::trace!("installed input monitor {id:?} on surface {}", self.surface);
        self.installed = Some(id);
    }

    /// Remove the monitor. No-op when not installed.
    fn uninstall(&mut self) {
        if let Some(id) = self.installed.take() {
            self.monitor.remove_monitor(id);
            log::trace!("removed input monitor {id:?} from surface {}", self.surface);
        }
    }

    fn check(&self) {
        debug_assert_eq!(
            self.installed.is_some(),
            self.items > 0,
            "monitor state diverged from item count on surface {}",
            self.surface
        );
    }
}

impl Drop for MonitorLifecycle {
    fn drop(&mut self) {
        self.uninstall();
    }
}

impl fmt::Debug for MonitorLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorLifecycle")
            .field("surface", &self.surface)
            .field("installed", &self.installed)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

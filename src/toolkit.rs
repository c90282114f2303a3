//! Collaborator interfaces consumed by the binding engine.
//!
//! The engine never renders, loads files, or delivers events itself. A widget
//! toolkit plugs in through three traits:
//!
//! - [`UiLoader`] materializes a declarative source into a [`LoadedTree`].
//! - [`SignalConnector`] connects/disconnects callbacks to widget signals.
//! - [`InputMonitor`] installs low-level mouse monitors on a surface.
//!
//! All three take `&self`; toolkits are expected to use interior mutability,
//! matching the single-threaded event-loop model.

use std::fmt;
use std::rc::Rc;

use crate::input::MouseEvent;
use crate::signal::EventValue;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Opaque toolkit handle of a live widget (or surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetHandle(pub u64);

impl fmt::Display for WidgetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of one signal connection, as returned by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

/// Handle of one installed input monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorId(pub u64);

/// Callback invoked on signal emission with the values the signal delivers.
pub type SignalCallback = Rc<dyn Fn(&[EventValue])>;

/// Callback invoked for every mouse event on a monitored surface. Returns
/// `true` when the event was consumed.
pub type MonitorCallback = Rc<dyn Fn(&MouseEvent) -> bool>;

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// One widget yielded by a loaded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedWidget {
    /// Declared name (unparsed identifier string).
    pub name: String,
    /// Toolkit type tag, e.g. `"PushButton"`.
    pub widget_type: String,
    pub handle: WidgetHandle,
}

/// Output of a [`UiLoader`]: widgets in any order plus parent/child links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedTree {
    pub widgets: Vec<LoadedWidget>,
    /// `(parent, child)` pairs.
    pub links: Vec<(WidgetHandle, WidgetHandle)>,
}

impl LoadedTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget (builder).
    pub fn with_widget(
        mut self,
        name: impl Into<String>,
        widget_type: impl Into<String>,
        handle: WidgetHandle,
    ) -> Self {
        self.widgets.push(LoadedWidget {
            name: name.into(),
            widget_type: widget_type.into(),
            handle,
        });
        self
    }

    /// Link `child` under `parent` (builder).
    pub fn with_child(mut self, parent: WidgetHandle, child: WidgetHandle) -> Self {
        self.links.push((parent, child));
        self
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

/// Errors from loading a declarative source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("UI source not found: {0}")]
    SourceNotFound(String),
    #[error("malformed UI source {name}: {reason}")]
    MalformedSource { name: String, reason: String },
}

/// Materializes declarative UI sources.
pub trait UiLoader {
    /// Load the source identified by `source`.
    fn load(&self, source: &str) -> Result<LoadedTree, LoadError>;

    /// Names of every source this loader can load. Used for preloading and
    /// hierarchy relatives; loaders that cannot enumerate return nothing.
    fn sources(&self) -> Vec<String> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Failure to connect a signal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("widget {widget} has no signal {signal:?}")]
    NoSuchSignal { widget: WidgetHandle, signal: String },
    #[error("widget {0} no longer exists")]
    StaleWidget(WidgetHandle),
}

/// Signal connection primitive of the widget toolkit.
pub trait SignalConnector {
    fn connect(
        &self,
        widget: WidgetHandle,
        signal: &str,
        callback: SignalCallback,
    ) -> Result<ConnectionId, ConnectError>;

    /// Disconnect a connection. Unknown ids are ignored.
    fn disconnect(&self, connection: ConnectionId);
}

// ---------------------------------------------------------------------------
// Input monitors
// ---------------------------------------------------------------------------

/// Low-level input monitor installation primitive.
pub trait InputMonitor {
    fn install_monitor(&self, surface: WidgetHandle, callback: MonitorCallback) -> MonitorId;

    /// Remove a monitor. Unknown ids are ignored.
    fn remove_monitor(&self, monitor: MonitorId);
}

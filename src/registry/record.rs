//! Per-widget binding record.

use std::fmt;
use std::rc::Rc;

use crate::binding::BindError;
use crate::handler::{CallPlan, Method};
use crate::naming::Identifier;
use crate::toolkit::{ConnectionId, WidgetHandle};

/// Where a widget is in the binding state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BindState {
    /// Registered, identifier parsed.
    #[default]
    Discovered,
    /// No handler method matches the base name. Terminal, not an error.
    NoHandler,
    /// A handler method was found.
    HandlerResolved,
    /// The signal(s) to bind are known.
    SignalResolved,
    /// Connected to the handler.
    Bound,
    /// Connected and the one-time initializer has run.
    Initialized,
    /// A configuration error stopped binding; see [`WidgetRecord::error`].
    Failed,
}

impl fmt::Display for BindState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BindState::Discovered => "discovered",
            BindState::NoHandler => "no handler",
            BindState::HandlerResolved => "handler resolved",
            BindState::SignalResolved => "signal resolved",
            BindState::Bound => "bound",
            BindState::Initialized => "initialized",
            BindState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One live widget of a UI instance.
#[derive(Debug, Clone)]
pub struct WidgetRecord {
    pub(crate) identifier: Identifier,
    pub(crate) widget_type: String,
    pub(crate) handle: WidgetHandle,
    pub(crate) handler: Option<Rc<Method>>,
    pub(crate) plan: Option<Rc<CallPlan>>,
    pub(crate) bound_signals: Vec<String>,
    pub(crate) connections: Vec<ConnectionId>,
    pub(crate) is_initialized: bool,
    pub(crate) is_connected: bool,
    pub(crate) state: BindState,
    pub(crate) error: Option<BindError>,
}

impl WidgetRecord {
    pub(crate) fn new(identifier: Identifier, widget_type: String, handle: WidgetHandle) -> Self {
        Self {
            identifier,
            widget_type,
            handle,
            handler: None,
            plan: None,
            bound_signals: Vec::new(),
            connections: Vec::new(),
            is_initialized: false,
            is_connected: false,
            state: BindState::Discovered,
            error: None,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The declared name (trimmed).
    pub fn name(&self) -> &str {
        self.identifier.raw()
    }

    pub fn base_name(&self) -> &str {
        self.identifier.base_name()
    }

    pub fn widget_type(&self) -> &str {
        &self.widget_type
    }

    pub fn handle(&self) -> WidgetHandle {
        self.handle
    }

    /// The bound handler method, if any.
    pub fn handler_ref(&self) -> Option<&Rc<Method>> {
        self.handler.as_ref()
    }

    /// The call plan shared by every signal bound to this widget.
    pub fn plan(&self) -> Option<&Rc<CallPlan>> {
        self.plan.as_ref()
    }

    /// The first bound signal.
    pub fn bound_signal(&self) -> Option<&str> {
        self.bound_signals.first().map(String::as_str)
    }

    pub fn bound_signals(&self) -> &[String] {
        &self.bound_signals
    }

    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn state(&self) -> BindState {
        self.state
    }

    /// The configuration error recorded by the last bind pass.
    pub fn error(&self) -> Option<&BindError> {
        self.error.as_ref()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.identifier.has_tag(tag)
    }

    /// Record a failure. Drops the handler binding but keeps the
    /// initialization flag so initializers never run twice.
    pub(crate) fn fail(&mut self, error: BindError) {
        self.state = BindState::Failed;
        self.handler = None;
        self.plan = None;
        self.bound_signals.clear();
        self.is_connected = false;
        self.error = Some(error);
    }

    /// Forget connections after they were disconnected.
    pub(crate) fn mark_disconnected(&mut self) {
        self.connections.clear();
        self.is_connected = false;
        if matches!(self.state, BindState::Bound | BindState::Initialized) {
            self.state = BindState::SignalResolved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::resolve;

    fn record() -> WidgetRecord {
        WidgetRecord::new(
            resolve("save_btn#primary").unwrap(),
            "PushButton".into(),
            WidgetHandle(4),
        )
    }

    #[test]
    fn fresh_record() {
        let r = record();
        assert_eq!(r.name(), "save_btn#primary");
        assert_eq!(r.base_name(), "save_btn");
        assert!(r.has_tag("primary"));
        assert_eq!(r.state(), BindState::Discovered);
        assert!(r.handler_ref().is_none());
        assert_eq!(r.bound_signal(), None);
        assert!(!r.is_connected());
        assert!(!r.is_initialized());
    }

    #[test]
    fn fail_clears_binding() {
        let mut r = record();
        r.handler = Some(Rc::new(Method::new("save_btn", &[], None, |_, _| Ok(()))));
        r.bound_signals = vec!["clicked".into()];
        r.is_connected = true;
        r.is_initialized = true;
        r.fail(BindError::NoResolvableSignal {
            widget_type: "PushButton".into(),
        });
        assert_eq!(r.state(), BindState::Failed);
        assert!(r.handler_ref().is_none());
        assert!(r.bound_signals().is_empty());
        assert!(!r.is_connected());
        assert!(r.is_initialized());
        assert!(r.error().is_some());
    }

    #[test]
    fn disconnect_steps_back() {
        let mut r = record();
        r.state = BindState::Initialized;
        r.is_connected = true;
        r.connections = vec![ConnectionId(1)];
        r.mark_disconnected();
        assert_eq!(r.state(), BindState::SignalResolved);
        assert!(r.connections().is_empty());
        assert!(!r.is_connected());
    }

    #[test]
    fn state_display() {
        assert_eq!(BindState::NoHandler.to_string(), "no handler");
        assert_eq!(BindState::Initialized.to_string(), "initialized");
    }
}

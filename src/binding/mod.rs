//! Binding orchestration.
//!
//! For every widget entering a UI instance's registry the bind pass:
//!
//! 1. looks up a handler method named after the widget's base name
//!    (absence is the terminal `NoHandler` state, not an error);
//! 2. resolves the signal(s): the method's explicit override, else the
//!    widget type's default from the [`SignalPolicy`](crate::signal::SignalPolicy);
//! 3. computes (or reuses) the method's call plan and connects every signal;
//! 4. runs the `<base_name>_init` method once, if the handler has one.
//!
//! A failure on one widget is recorded on its record and in the
//! [`BindReport`]; the pass carries on with the remaining widgets.

pub mod binder;
pub mod report;

pub use binder::{bind_slot, bind_ui, bind_widgets, disconnect_ui, disconnect_widgets};
pub use report::{BindFailure, BindReport};

use crate::handler::{InvokeError, UnsupportedHandlerParameter};
use crate::signal::UnmappedWidgetType;
use crate::toolkit::ConnectError;

/// Configuration error of a single widget.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// Strict mode only: the widget type has no signal table entry.
    #[error(transparent)]
    UnmappedWidgetType(#[from] UnmappedWidgetType),
    /// A handler exists but there is no signal to bind it to.
    #[error("handler found but widget type {widget_type:?} has no default signal")]
    NoResolvableSignal { widget_type: String },
    #[error(transparent)]
    UnsupportedHandlerParameter(#[from] UnsupportedHandlerParameter),
    #[error(transparent)]
    Connect(#[from] ConnectError),
    /// The initializer ran into a call already in progress on the same
    /// handler instance.
    #[error("handler busy while running {0}")]
    HandlerBusy(String),
    #[error("initializer failed: {0}")]
    Init(InvokeError),
    /// An explicitly requested slot is not a method of the UI's handler.
    #[error("handler has no method {0:?}")]
    UnknownSlot(String),
}

impl From<InvokeError> for BindError {
    fn from(err: InvokeError) -> Self {
        match err {
            InvokeError::Busy(method) => BindError::HandlerBusy(method),
            other => BindError::Init(other),
        }
    }
}

//! Crate-level error type.
//!
//! Structural failures (bad names, missing or malformed sources) surface
//! here. Configuration failures of single widgets never do; they are
//! recorded on the widget and reported in a
//! [`BindReport`](crate::binding::BindReport).

use crate::naming::NameError;
use crate::toolkit::LoadError;

/// Errors returned by [`Switchboard`](crate::Switchboard) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("switchboard has no {0} configured")]
    MissingCollaborator(&'static str),
    #[error("UI {ui} has no widget {widget:?}")]
    UnknownWidget { ui: String, widget: String },
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

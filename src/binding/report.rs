//! Batched result of one bind pass.

use std::fmt;

use super::BindError;

/// One widget that failed to bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindFailure {
    pub widget: String,
    pub error: BindError,
}

/// Outcome of a bind pass over one UI instance.
///
/// Failures are collected for the whole pass and logged once, after every
/// widget has been visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    pub ui: String,
    /// Widgets connected to a handler by this pass.
    pub bound: usize,
    /// Initializers run by this pass.
    pub initialized: usize,
    /// Widgets with no handler method.
    pub without_handler: usize,
    /// Widgets already connected before this pass.
    pub already_connected: usize,
    pub failures: Vec<BindFailure>,
}

impl BindReport {
    pub fn new(ui: impl Into<String>) -> Self {
        Self {
            ui: ui.into(),
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn fail(&mut self, widget: &str, error: BindError) {
        self.failures.push(BindFailure {
            widget: widget.to_owned(),
            error,
        });
    }

    /// The failure recorded for `widget`.
    pub fn failure(&self, widget: &str) -> Option<&BindError> {
        self.failures
            .iter()
            .find(|f| f.widget == widget)
            .map(|f| &f.error)
    }

    /// Log the report: one warning listing every failure, or a debug line
    /// when the pass was clean.
    pub fn log(&self) {
        if self.is_clean() {
            log::debug!("{self}");
        } else {
            log::warn!("{self}");
        }
    }
}

impl fmt::Display for BindReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bound UI {}: {} bound, {} initialized, {} without handler, {} failed",
            self.ui,
            self.bound,
            self.initialized,
            self.without_handler,
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "\n  {}: {}", failure.widget, failure.error)?;
        }
        Ok(())
    }
}

//! Handler classes and their invocation.
//!
//! - [`class`]: descriptors, builder, per-UI instances
//! - [`inspect`]: signature inspection and cached call plans
//! - [`invocation`]: positional arguments and [`FromArg`]
//! - [`history`]: bounded slot/UI histories
//!
//! [`HandlerRegistry`] is the locator: it is populated at startup and maps
//! derived class names to descriptors.

pub mod class;
pub mod history;
pub mod inspect;
pub mod invocation;

pub use class::{HandlerClass, HandlerClassBuilder, HandlerInstance, Method};
pub use history::{History, SlotCall};
pub use inspect::{compute_injection, CallPlan, Injection, PlanCache, Unsupported, UnsupportedHandlerParameter};
pub use invocation::{Arg, FromArg, IntoHandlerResult, Invocation, InvokeError};

use std::collections::HashMap;
use std::rc::Rc;

use crate::naming::Identifier;

/// Implemented by types whose `impl` block carries `#[handlers]`.
pub trait Handlers: 'static {
    /// The generated class descriptor.
    fn handler_class() -> HandlerClass;
}

/// Startup-populated map from class name to handler class.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    classes: HashMap<String, Rc<HandlerClass>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class under its own name. Returns the class it replaced.
    pub fn register(&mut self, class: HandlerClass) -> Option<Rc<HandlerClass>> {
        self.classes
            .insert(class.name().to_owned(), Rc::new(class))
    }

    /// Register the class generated for `T`.
    pub fn register_type<T: Handlers>(&mut self) -> Option<Rc<HandlerClass>> {
        self.register(T::handler_class())
    }

    pub fn get(&self, name: &str) -> Option<&Rc<HandlerClass>> {
        self.classes.get(name)
    }

    /// The handler class for a UI: the first registered name among
    /// `ui.handler_class_candidates(suffix)`. `None` means the UI has no
    /// handlers.
    pub fn resolve(&self, ui: &Identifier, suffix: &str) -> Option<Rc<HandlerClass>> {
        let found = ui
            .handler_class_candidates(suffix)
            .into_iter()
            .find_map(|name| self.classes.get(&name).cloned());
        if found.is_none() {
            log::debug!("no handler class for UI {}", ui.path_string());
        }
        found
    }

    /// Registered class names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

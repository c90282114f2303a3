//! Handler class descriptors.
//!
//! A [`HandlerClass`] replaces runtime reflection: it names the class, knows
//! how to construct an instance for a UI, and lists its [`Method`]s with
//! their declared parameter names and optional signal overrides. Classes are
//! written by hand with [`HandlerClassBuilder`] or derived from an `impl`
//! block with the `#[handlers]` macro.

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::invocation::{Invocation, InvokeError};
use crate::switchboard::Switchboard;

/// Type-erased method body.
pub type MethodFn = Rc<dyn Fn(&mut dyn Any, &Invocation) -> Result<(), InvokeError>>;

type ConstructFn = Rc<dyn Fn(&Switchboard) -> Box<dyn Any>>;

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// One handler method: its name, declared parameters and body.
#[derive(Clone)]
pub struct Method {
    name: String,
    params: Vec<String>,
    signals: Option<Vec<String>>,
    call: MethodFn,
}

impl Method {
    pub fn new<F>(name: &str, params: &[&str], signals: Option<&[&str]>, call: F) -> Self
    where
        F: Fn(&mut dyn Any, &Invocation) -> Result<(), InvokeError> + 'static,
    {
        Self {
            name: name.to_owned(),
            params: params.iter().map(|p| (*p).to_owned()).collect(),
            signals: signals.map(|s| s.iter().map(|n| (*n).to_owned()).collect()),
            call: Rc::new(call),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter names, in order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Explicit signal override, if the method carries one.
    pub fn signals(&self) -> Option<&[String]> {
        self.signals.as_deref()
    }

    /// Run the body against a handler instance.
    pub fn call(&self, instance: &mut dyn Any, invocation: &Invocation) -> Result<(), InvokeError> {
        (self.call)(instance, invocation)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("signals", &self.signals)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// HandlerClass
// ---------------------------------------------------------------------------

/// Describes a handler class: name, constructor and methods.
pub struct HandlerClass {
    name: String,
    construct: ConstructFn,
    methods: HashMap<String, Rc<Method>>,
}

impl HandlerClass {
    /// Start building a class whose instances are `T`.
    pub fn builder<T, F>(name: impl Into<String>, construct: F) -> HandlerClassBuilder<T>
    where
        T: 'static,
        F: Fn(&Switchboard) -> T + 'static,
    {
        HandlerClassBuilder {
            name: name.into(),
            construct: Rc::new(move |sb: &Switchboard| Box::new(construct(sb)) as Box<dyn Any>),
            methods: HashMap::new(),
            _instance: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self, name: &str) -> Option<&Rc<Method>> {
        self.methods.get(name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Construct an instance for one UI.
    pub fn instantiate(self: &Rc<Self>, sb: &Switchboard) -> HandlerInstance {
        HandlerInstance {
            class: Rc::clone(self),
            object: RefCell::new((self.construct)(sb)),
        }
    }
}

impl fmt::Debug for HandlerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerClass")
            .field("name", &self.name)
            .field("methods", &self.method_names())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// HandlerClassBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`HandlerClass`] with instances of type `T`.
pub struct HandlerClassBuilder<T> {
    name: String,
    construct: ConstructFn,
    methods: HashMap<String, Rc<Method>>,
    _instance: PhantomData<fn() -> T>,
}

impl<T: 'static> HandlerClassBuilder<T> {
    /// Add a method bound to the widget type's default signal.
    pub fn method<F>(self, name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(&mut T, &Invocation) -> Result<(), InvokeError> + 'static,
    {
        self.add(name, params, None, body)
    }

    /// Add a method bound to the listed signals instead of the default.
    pub fn method_on<F>(self, name: &str, signals: &[&str], params: &[&str], body: F) -> Self
    where
        F: Fn(&mut T, &Invocation) -> Result<(), InvokeError> + 'static,
    {
        self.add(name, params, Some(signals), body)
    }

    fn add<F>(mut self, name: &str, params: &[&str], signals: Option<&[&str]>, body: F) -> Self
    where
        F: Fn(&mut T, &Invocation) -> Result<(), InvokeError> + 'static,
    {
        let method = Method::new(name, params, signals, move |object, invocation| {
            let this = object
                .downcast_mut::<T>()
                .ok_or_else(|| InvokeError::WrongInstance {
                    method: invocation.method().to_owned(),
                    expected: type_name::<T>(),
                })?;
            body(this, invocation)
        });
        self.methods.insert(name.to_owned(), Rc::new(method));
        self
    }

    pub fn build(self) -> HandlerClass {
        HandlerClass {
            name: self.name,
            construct: self.construct,
            methods: self.methods,
        }
    }
}

// ---------------------------------------------------------------------------
// HandlerInstance
// ---------------------------------------------------------------------------

/// The handler object of one UI instance.
pub struct HandlerInstance {
    class: Rc<HandlerClass>,
    object: RefCell<Box<dyn Any>>,
}

impl HandlerInstance {
    pub fn class(&self) -> &Rc<HandlerClass> {
        &self.class
    }

    pub fn method(&self, name: &str) -> Option<&Rc<Method>> {
        self.class.method(name)
    }

    /// Run `method` on this instance. A call made while another method of
    /// the same instance is running is refused with [`InvokeError::Busy`].
    pub fn invoke(&self, method: &Method, invocation: &Invocation) -> Result<(), InvokeError> {
        let mut object = self
            .object
            .try_borrow_mut()
            .map_err(|_| InvokeError::Busy(method.name().to_owned()))?;
        method.call(object.as_mut(), invocation)
    }

    /// Borrow the instance as `T`, e.g. to inspect handler state in tests.
    /// `None` when the instance is another type or currently running.
    pub fn with<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let object = self.object.try_borrow().ok()?;
        object.downcast_ref::<T>().map(f)
    }
}

impl fmt::Debug for HandlerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerInstance")
            .field("class", &self.class.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::invocation::Arg;
    use crate::testing::bare_switchboard;

    #[derive(Default)]
    struct Counter {
        clicks: u32,
        last_text: String,
    }

    fn counter_class() -> Rc<HandlerClass> {
        Rc::new(
            HandlerClass::builder("MainSlots", |_| Counter::default())
                .method("save_btn", &[], |this: &mut Counter, _| {
                    this.clicks += 1;
                    Ok(())
                })
                .method_on(
                    "search_box",
                    &["text-changed", "enter-pressed"],
                    &["text"],
                    |this: &mut Counter, inv| {
                        this.last_text = inv.extract(0)?;
                        Ok(())
                    },
                )
                .build(),
        )
    }

    // ── Descriptor ───────────────────────────────────────────────────

    #[test]
    fn builder_records_methods() {
        let class = counter_class();
        assert_eq!(class.name(), "MainSlots");
        assert_eq!(class.method_names(), vec!["save_btn", "search_box"]);
        let search = class.method("search_box").unwrap();
        assert_eq!(search.params(), &["text".to_owned()]);
        assert_eq!(
            search.signals(),
            Some(&["text-changed".to_owned(), "enter-pressed".to_owned()][..])
        );
        assert_eq!(class.method("save_btn").unwrap().signals(), None);
        assert!(!class.has_method("missing"));
    }

    // ── Instances ────────────────────────────────────────────────────

    #[test]
    fn invoke_mutates_instance() {
        let sb = bare_switchboard();
        let instance = counter_class().instantiate(&sb);
        let save = Rc::clone(instance.method("save_btn").unwrap());
        instance.invoke(&save, &Invocation::new("save_btn", vec![])).unwrap();
        instance.invoke(&save, &Invocation::new("save_btn", vec![])).unwrap();

        let search = Rc::clone(instance.method("search_box").unwrap());
        instance
            .invoke(
                &search,
                &Invocation::new("search_box", vec![Arg::Value("abc".into())]),
            )
            .unwrap();

        assert_eq!(instance.with(|c: &Counter| c.clicks), Some(2));
        assert_eq!(
            instance.with(|c: &Counter| c.last_text.clone()).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn argument_errors_propagate() {
        let sb = bare_switchboard();
        let instance = counter_class().instantiate(&sb);
        let search = Rc::clone(instance.method("search_box").unwrap());
        let err = instance
            .invoke(&search, &Invocation::new("search_box", vec![]))
            .unwrap_err();
        assert!(matches!(err, InvokeError::MissingArg { position: 0, .. }));
    }

    #[test]
    fn wrong_instance_type() {
        let class = counter_class();
        let method = class.method("save_btn").unwrap();
        let mut other: Box<dyn Any> = Box::new(5_u8);
        let err = method
            .call(other.as_mut(), &Invocation::new("save_btn", vec![]))
            .unwrap_err();
        assert!(matches!(err, InvokeError::WrongInstance { .. }));
    }

    #[test]
    fn reentrant_call_is_refused() {
        let sb = bare_switchboard();
        let class = counter_class();
        let instance = class.instantiate(&sb);
        let save = Rc::clone(instance.method("save_btn").unwrap());

        let _held = instance.object.borrow_mut();
        let err = instance
            .invoke(&save, &Invocation::new("save_btn", vec![]))
            .unwrap_err();
        assert_eq!(err, InvokeError::Busy("save_btn".into()));
    }
}

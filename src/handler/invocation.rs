//! Runtime arguments handed to a handler method.

use std::any::type_name;
use std::fmt;
use std::rc::Rc;

use crate::signal::EventValue;
use crate::switchboard::Switchboard;
use crate::toolkit::WidgetHandle;
use crate::ui::Ui;

/// Failure while invoking a handler method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    #[error("{method}: no argument at position {position}")]
    MissingArg { method: String, position: usize },
    #[error("{method}: argument {position} is {found}, expected {expected}")]
    ArgType {
        method: String,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{0}: handler instance is already running")]
    Busy(String),
    #[error("{method}: handler instance is not a {expected}")]
    WrongInstance {
        method: String,
        expected: &'static str,
    },
}

/// One positional argument.
#[derive(Clone)]
pub enum Arg {
    Value(EventValue),
    Widget(WidgetHandle),
    Ui(Rc<Ui>),
    Switchboard(Switchboard),
}

impl Arg {
    /// Short description of the argument's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Arg::Value(EventValue::Bool(_)) => "bool value",
            Arg::Value(EventValue::Int(_)) => "int value",
            Arg::Value(EventValue::Float(_)) => "float value",
            Arg::Value(EventValue::Text(_)) => "text value",
            Arg::Value(EventValue::Item(_)) => "item value",
            Arg::Widget(_) => "widget",
            Arg::Ui(_) => "ui",
            Arg::Switchboard(_) => "switchboard",
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Arg::Widget(h) => f.debug_tuple("Widget").field(h).finish(),
            Arg::Ui(ui) => f.debug_tuple("Ui").field(&ui.name()).finish(),
            Arg::Switchboard(_) => f.write_str("Switchboard"),
        }
    }
}

/// Conversion from a positional [`Arg`] into a handler parameter type.
///
/// Implemented for the event value types, [`WidgetHandle`], `Rc<Ui>` and
/// [`Switchboard`]. Handler classes generated by the `#[handlers]` macro
/// convert every parameter through this trait.
pub trait FromArg: Sized {
    fn from_arg(arg: &Arg) -> Option<Self>;
}

impl FromArg for Arg {
    fn from_arg(arg: &Arg) -> Option<Self> {
        Some(arg.clone())
    }
}

impl FromArg for EventValue {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Value(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromArg for bool {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Value(v) => v.as_bool(),
            _ => None,
        }
    }
}

impl FromArg for i64 {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Value(v) => v.as_int(),
            _ => None,
        }
    }
}

impl FromArg for i32 {
    fn from_arg(arg: &Arg) -> Option<Self> {
        i64::from_arg(arg).and_then(|n| i32::try_from(n).ok())
    }
}

impl FromArg for usize {
    fn from_arg(arg: &Arg) -> Option<Self> {
        i64::from_arg(arg).and_then(|n| usize::try_from(n).ok())
    }
}

impl FromArg for f64 {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Value(v) => v.as_float(),
            _ => None,
        }
    }
}

impl FromArg for String {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Value(v) => v.as_str().map(str::to_owned),
            _ => None,
        }
    }
}

impl FromArg for WidgetHandle {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Widget(h) => Some(*h),
            _ => None,
        }
    }
}

impl FromArg for Rc<Ui> {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Ui(ui) => Some(Rc::clone(ui)),
            _ => None,
        }
    }
}

impl FromArg for Switchboard {
    fn from_arg(arg: &Arg) -> Option<Self> {
        match arg {
            Arg::Switchboard(sb) => Some(sb.clone()),
            _ => None,
        }
    }
}

/// Return types a `#[handlers]` method may have.
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> Result<(), InvokeError>;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> Result<(), InvokeError> {
        Ok(())
    }
}

impl IntoHandlerResult for Result<(), InvokeError> {
    fn into_handler_result(self) -> Result<(), InvokeError> {
        self
    }
}

/// The arguments of one handler call, in declared parameter order.
#[derive(Debug, Clone)]
pub struct Invocation {
    method: String,
    args: Vec<Arg>,
}

impl Invocation {
    pub fn new(method: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// Name of the method being invoked.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The argument for declared parameter `position`.
    pub fn arg(&self, position: usize) -> Result<&Arg, InvokeError> {
        self.args.get(position).ok_or_else(|| InvokeError::MissingArg {
            method: self.method.clone(),
            position,
        })
    }

    /// Convert the argument at `position`.
    pub fn extract<T: FromArg>(&self, position: usize) -> Result<T, InvokeError> {
        let arg = self.arg(position)?;
        T::from_arg(arg).ok_or_else(|| InvokeError::ArgType {
            method: self.method.clone(),
            position,
            expected: type_name::<T>(),
            found: arg.kind_name(),
        })
    }

    /// The first widget argument, if the method asked for one.
    pub fn widget(&self) -> Option<WidgetHandle> {
        self.args.iter().find_map(WidgetHandle::from_arg)
    }

    /// The first event value, if the method asked for one.
    pub fn value(&self) -> Option<&EventValue> {
        self.args.iter().find_map(|a| match a {
            Arg::Value(v) => Some(v),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inv(args: Vec<Arg>) -> Invocation {
        Invocation::new("save_btn", args)
    }

    // ── FromArg ──────────────────────────────────────────────────────

    #[test]
    fn numeric_conversions() {
        let int = Arg::Value(EventValue::Int(2));
        assert_eq!(i64::from_arg(&int), Some(2));
        assert_eq!(i32::from_arg(&int), Some(2));
        assert_eq!(usize::from_arg(&int), Some(2));
        assert_eq!(f64::from_arg(&int), Some(2.0));
        assert_eq!(bool::from_arg(&int), Some(true));

        let negative = Arg::Value(EventValue::Int(-1));
        assert_eq!(usize::from_arg(&negative), None);
    }

    #[test]
    fn bool_and_state() {
        assert_eq!(bool::from_arg(&Arg::Value(true.into())), Some(true));
        assert_eq!(bool::from_arg(&Arg::Value(EventValue::Int(0))), Some(false));
        assert_eq!(i64::from_arg(&Arg::Value(true.into())), Some(1));
    }

    #[test]
    fn text_and_item() {
        assert_eq!(
            String::from_arg(&Arg::Value("abc".into())).as_deref(),
            Some("abc")
        );
        assert_eq!(
            String::from_arg(&Arg::Value(EventValue::Item("row".into()))).as_deref(),
            Some("row")
        );
        assert_eq!(String::from_arg(&Arg::Widget(WidgetHandle(1))), None);
    }

    #[test]
    fn widget_handle() {
        assert_eq!(
            WidgetHandle::from_arg(&Arg::Widget(WidgetHandle(3))),
            Some(WidgetHandle(3))
        );
        assert_eq!(WidgetHandle::from_arg(&Arg::Value(1_i64.into())), None);
    }

    // ── Invocation ───────────────────────────────────────────────────

    #[test]
    fn extract_by_position() {
        let call = inv(vec![Arg::Value("hi".into()), Arg::Widget(WidgetHandle(7))]);
        assert_eq!(call.extract::<String>(0).unwrap(), "hi");
        assert_eq!(call.extract::<WidgetHandle>(1).unwrap(), WidgetHandle(7));
        assert_eq!(call.widget(), Some(WidgetHandle(7)));
        assert_eq!(call.value(), Some(&EventValue::Text("hi".into())));
    }

    #[test]
    fn extract_errors() {
        let call = inv(vec![Arg::Widget(WidgetHandle(7))]);
        assert_eq!(
            call.extract::<String>(3),
            Err(InvokeError::MissingArg {
                method: "save_btn".into(),
                position: 3
            })
        );
        let err = call.extract::<i64>(0).unwrap_err();
        assert!(matches!(
            err,
            InvokeError::ArgType {
                position: 0,
                found: "widget",
                ..
            }
        ));
    }

    #[test]
    fn empty_invocation() {
        let call = inv(Vec::new());
        assert!(call.is_empty());
        assert_eq!(call.widget(), None);
        assert_eq!(call.method(), "save_btn");
    }
}

//! Event payload vocabulary: what a signal delivers and in which shape.

use std::fmt;

/// Kind of value an event delivers to a handler.
///
/// A signal's *shape* is an ordered list of these kinds; the delivered
/// [`EventValue`]s line up with it position by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKind {
    /// A numeric or date/time value (`value-changed`).
    Value,
    /// A position in a list of pages, entries or rows.
    Index,
    /// A check/toggle state.
    State,
    /// Text content.
    Text,
    /// An item of a list/tree/menu.
    Item,
    /// A column of a table/tree.
    Column,
}

impl ParamKind {
    /// All kinds, in declaration order.
    pub const ALL: [ParamKind; 6] = [
        ParamKind::Value,
        ParamKind::Index,
        ParamKind::State,
        ParamKind::Text,
        ParamKind::Item,
        ParamKind::Column,
    ];

    /// The handler parameter name that requests this kind.
    pub fn param_name(self) -> &'static str {
        match self {
            ParamKind::Value => "value",
            ParamKind::Index => "index",
            ParamKind::State => "state",
            ParamKind::Text => "text",
            ParamKind::Item => "item",
            ParamKind::Column => "column",
        }
    }

    /// Look up a kind by handler parameter name.
    pub fn from_param_name(name: &str) -> Option<ParamKind> {
        Self::ALL.into_iter().find(|k| k.param_name() == name)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

/// A value delivered by a signal emission.
#[derive(Debug, Clone, PartialEq)]
pub enum EventValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Item label or toolkit item key.
    Item(String),
}

impl EventValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EventValue::Bool(b) => Some(*b),
            EventValue::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            EventValue::Int(i) => Some(*i),
            EventValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            EventValue::Float(f) => Some(*f),
            EventValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text of a `Text` or `Item` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventValue::Text(s) | EventValue::Item(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for EventValue {
    fn from(v: bool) -> Self {
        EventValue::Bool(v)
    }
}

impl From<i64> for EventValue {
    fn from(v: i64) -> Self {
        EventValue::Int(v)
    }
}

impl From<i32> for EventValue {
    fn from(v: i32) -> Self {
        EventValue::Int(i64::from(v))
    }
}

impl From<f64> for EventValue {
    fn from(v: f64) -> Self {
        EventValue::Float(v)
    }
}

impl From<&str> for EventValue {
    fn from(v: &str) -> Self {
        EventValue::Text(v.to_owned())
    }
}

impl From<String> for EventValue {
    fn from(v: String) -> Self {
        EventValue::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_names_round_trip() {
        for kind in ParamKind::ALL {
            assert_eq!(ParamKind::from_param_name(kind.param_name()), Some(kind));
        }
        assert_eq!(ParamKind::from_param_name("widget"), None);
    }

    #[test]
    fn conversions() {
        assert_eq!(EventValue::Int(1).as_bool(), Some(true));
        assert_eq!(EventValue::Bool(true).as_int(), Some(1));
        assert_eq!(EventValue::Int(2).as_float(), Some(2.0));
        assert_eq!(EventValue::Item("row".into()).as_str(), Some("row"));
        assert_eq!(EventValue::Float(1.5).as_str(), None);
    }

    #[test]
    fn from_impls() {
        assert_eq!(EventValue::from("x"), EventValue::Text("x".into()));
        assert_eq!(EventValue::from(3_i64), EventValue::Int(3));
        assert_eq!(EventValue::from(false), EventValue::Bool(false));
    }
}

//! Signal policy: default signals per widget type and event payload shapes.

pub mod policy;
pub mod value;

pub use policy::{SignalBinding, SignalPolicy, SignalSpec, UnmappedWidgetType, WidgetSignals};
pub use value::{EventValue, ParamKind};

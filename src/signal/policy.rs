//! Signal policy table: default signal and parameter shape per widget type.
//!
//! The table is built once (usually [`SignalPolicy::standard`] plus a few
//! custom widget entries) and is read-only afterwards. Lookups for unknown
//! widget types fail with [`UnmappedWidgetType`] rather than guessing; the
//! caller decides whether that is an error.

use std::collections::HashMap;

use super::value::ParamKind;
use ParamKind::*;

/// Lookup of a widget type that has no table entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no default signal for widget type {0:?}")]
pub struct UnmappedWidgetType(pub String);

/// One signal a widget type can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSpec {
    pub name: String,
    pub shape: Vec<ParamKind>,
}

impl SignalSpec {
    pub fn new(name: &str, shape: &[ParamKind]) -> Self {
        Self {
            name: name.to_owned(),
            shape: shape.to_vec(),
        }
    }
}

/// All signals of one widget type; the first is the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSignals {
    signals: Vec<SignalSpec>,
}

impl WidgetSignals {
    /// The default signal.
    pub fn default_signal(&self) -> &SignalSpec {
        &self.signals[0]
    }

    pub fn get(&self, signal: &str) -> Option<&SignalSpec> {
        self.signals.iter().find(|s| s.name == signal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalSpec> {
        self.signals.iter()
    }
}

/// Borrowed result of a default-signal lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalBinding<'a> {
    pub name: &'a str,
    pub shape: &'a [ParamKind],
}

fn sig(name: &str, shape: &[ParamKind]) -> SignalSpec {
    SignalSpec::new(name, shape)
}

/// Widget type -> signals table.
#[derive(Debug, Clone, Default)]
pub struct SignalPolicy {
    table: HashMap<String, WidgetSignals>,
}

impl SignalPolicy {
    /// An empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard table for the stock widget catalogue.
    pub fn standard() -> Self {
        Self::empty()
            .with_entry("Action", [sig("triggered", &[State]), sig("toggled", &[State])])
            .with_entry(
                "CheckBox",
                [sig("state-changed", &[State]), sig("toggled", &[State]), sig("clicked", &[State])],
            )
            .with_entry(
                "ComboBox",
                [
                    sig("current-index-changed", &[Index]),
                    sig("current-text-changed", &[Text]),
                    sig("activated", &[Index]),
                ],
            )
            .with_entry("DateEdit", [sig("date-changed", &[Value])])
            .with_entry("DateTimeEdit", [sig("date-time-changed", &[Value])])
            .with_entry("Dial", [sig("value-changed", &[Value]), sig("slider-released", &[])])
            .with_entry("DoubleSpinBox", [sig("value-changed", &[Value]), sig("editing-finished", &[])])
            .with_entry("Label", [sig("released", &[]), sig("link-activated", &[Text])])
            .with_entry(
                "LineEdit",
                [
                    sig("text-changed", &[Text]),
                    sig("text-edited", &[Text]),
                    sig("enter-pressed", &[]),
                    sig("editing-finished", &[]),
                ],
            )
            .with_entry(
                "ListWidget",
                [
                    sig("item-clicked", &[Item]),
                    sig("item-double-clicked", &[Item]),
                    sig("current-row-changed", &[Index]),
                    sig("selection-changed", &[]),
                ],
            )
            .with_entry("Menu", [sig("triggered", &[Item]), sig("about-to-show", &[])])
            .with_entry("MenuBar", [sig("triggered", &[Item])])
            .with_entry("ProgressBar", [sig("value-changed", &[Value])])
            .with_entry(
                "PushButton",
                [sig("clicked", &[State]), sig("pressed", &[]), sig("released", &[]), sig("toggled", &[State])],
            )
            .with_alias("Button", "PushButton")
            .with_entry("RadioButton", [sig("toggled", &[State]), sig("clicked", &[State])])
            .with_entry("ScrollBar", [sig("value-changed", &[Value])])
            .with_entry("Slider", [sig("value-changed", &[Value]), sig("slider-released", &[])])
            .with_entry("SpinBox", [sig("value-changed", &[Value]), sig("editing-finished", &[])])
            .with_entry("StackedWidget", [sig("current-changed", &[Index])])
            .with_entry("TabBar", [sig("current-changed", &[Index])])
            .with_entry("TabWidget", [sig("current-changed", &[Index])])
            .with_entry(
                "TableWidget",
                [sig("cell-changed", &[Index, Column]), sig("cell-clicked", &[Index, Column])],
            )
            .with_entry("TextEdit", [sig("text-changed", &[])])
            .with_entry("TimeEdit", [sig("time-changed", &[Value])])
            .with_entry("ToolBox", [sig("current-changed", &[Index])])
            .with_entry(
                "TreeWidget",
                [sig("item-clicked", &[Item, Column]), sig("item-double-clicked", &[Item, Column])],
            )
    }

    /// Add or replace a widget type. The first signal becomes its default.
    ///
    /// Entries with no signals are ignored.
    pub fn with_entry(
        mut self,
        widget_type: impl Into<String>,
        signals: impl IntoIterator<Item = SignalSpec>,
    ) -> Self {
        let signals: Vec<SignalSpec> = signals.into_iter().collect();
        if signals.is_empty() {
            return self;
        }
        self.table.insert(widget_type.into(), WidgetSignals { signals });
        self
    }

    /// Add one non-default signal to an existing entry, or create the
    /// entry with it as the default.
    pub fn with_signal(
        mut self,
        widget_type: impl Into<String>,
        signal: &str,
        shape: &[ParamKind],
    ) -> Self {
        let spec = SignalSpec::new(signal, shape);
        let entry = self
            .table
            .entry(widget_type.into())
            .or_insert_with(|| WidgetSignals { signals: Vec::new() });
        match entry.signals.iter_mut().find(|s| s.name == signal) {
            Some(existing) => *existing = spec,
            None => entry.signals.push(spec),
        }
        self
    }

    /// Map `alias` to a copy of `existing`'s entry. No-op if `existing`
    /// is unmapped.
    pub fn with_alias(mut self, alias: impl Into<String>, existing: &str) -> Self {
        if let Some(entry) = self.table.get(existing).cloned() {
            self.table.insert(alias.into(), entry);
        }
        self
    }

    /// Default signal name and shape for `widget_type`.
    pub fn default_signal_for(
        &self,
        widget_type: &str,
    ) -> Result<SignalBinding<'_>, UnmappedWidgetType> {
        let spec = self
            .table
            .get(widget_type)
            .ok_or_else(|| UnmappedWidgetType(widget_type.to_owned()))?
            .default_signal();
        Ok(SignalBinding {
            name: &spec.name,
            shape: &spec.shape,
        })
    }

    /// Shape delivered by `signal` on `widget_type`, if the table knows it.
    pub fn shape_of(&self, widget_type: &str, signal: &str) -> Option<&[ParamKind]> {
        self.table
            .get(widget_type)?
            .get(signal)
            .map(|s| s.shape.as_slice())
    }

    pub fn signals_for(&self, widget_type: &str) -> Option<&WidgetSignals> {
        self.table.get(widget_type)
    }

    pub fn is_mapped(&self, widget_type: &str) -> bool {
        self.table.contains_key(widget_type)
    }

    /// Number of mapped widget types.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Standard table ───────────────────────────────────────────────

    #[test]
    fn button_clicks() {
        let policy = SignalPolicy::standard();
        let binding = policy.default_signal_for("PushButton").unwrap();
        assert_eq!(binding.name, "clicked");
        assert_eq!(binding.shape, &[State]);
    }

    #[test]
    fn button_alias() {
        let policy = SignalPolicy::standard();
        assert_eq!(
            policy.default_signal_for("Button").unwrap(),
            policy.default_signal_for("PushButton").unwrap()
        );
    }

    #[test]
    fn combo_box_delivers_index() {
        let policy = SignalPolicy::standard();
        let binding = policy.default_signal_for("ComboBox").unwrap();
        assert_eq!(binding.name, "current-index-changed");
        assert_eq!(binding.shape, &[Index]);
    }

    #[test]
    fn tree_widget_delivers_item_and_column() {
        let policy = SignalPolicy::standard();
        assert_eq!(
            policy.default_signal_for("TreeWidget").unwrap().shape,
            &[Item, Column]
        );
    }

    #[test]
    fn lookup_is_pure() {
        let policy = SignalPolicy::standard();
        for ty in ["CheckBox", "LineEdit", "Slider", "TabWidget"] {
            assert_eq!(
                policy.default_signal_for(ty).unwrap(),
                policy.default_signal_for(ty).unwrap()
            );
        }
    }

    #[test]
    fn unmapped_type_fails() {
        let policy = SignalPolicy::standard();
        assert_eq!(
            policy.default_signal_for("Frame"),
            Err(UnmappedWidgetType("Frame".into()))
        );
        assert!(!policy.is_mapped("Frame"));
    }

    #[test]
    fn shape_of_non_default_signal() {
        let policy = SignalPolicy::standard();
        assert_eq!(policy.shape_of("LineEdit", "enter-pressed"), Some(&[][..]));
        assert_eq!(policy.shape_of("LineEdit", "text-edited"), Some(&[Text][..]));
        assert_eq!(policy.shape_of("LineEdit", "nope"), None);
        assert_eq!(policy.shape_of("Nope", "clicked"), None);
    }

    // ── Custom entries ───────────────────────────────────────────────

    #[test]
    fn custom_widget_entry() {
        let policy = SignalPolicy::empty()
            .with_entry("ColorSwatch", [SignalSpec::new("color-changed", &[Value])]);
        assert_eq!(policy.len(), 1);
        assert_eq!(policy.default_signal_for("ColorSwatch").unwrap().name, "color-changed");
    }

    #[test]
    fn empty_entry_is_ignored() {
        let policy = SignalPolicy::empty().with_entry("Nothing", std::iter::empty());
        assert!(policy.is_empty());
    }

    #[test]
    fn with_signal_extends_existing() {
        let policy = SignalPolicy::standard().with_signal("Label", "hovered", &[]);
        assert_eq!(policy.default_signal_for("Label").unwrap().name, "released");
        assert!(policy.signals_for("Label").unwrap().get("hovered").is_some());
    }

    #[test]
    fn with_signal_creates_entry() {
        let policy = SignalPolicy::empty().with_signal("Knob", "turned", &[Value]);
        assert_eq!(policy.default_signal_for("Knob").unwrap().name, "turned");
    }

    #[test]
    fn alias_of_unmapped_is_noop() {
        let policy = SignalPolicy::empty().with_alias("A", "B");
        assert!(policy.is_empty());
    }
}

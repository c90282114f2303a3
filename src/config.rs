//! Switchboard configuration.

/// Default suffix of a widget's one-time initializer method.
pub const DEFAULT_INIT_SUFFIX: &str = "_init";
/// Default suffix of handler class names.
pub const DEFAULT_CLASS_SUFFIX: &str = "Slots";
/// Default bound of the slot and UI histories.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Configuration for a [`Switchboard`](crate::Switchboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchboardConfig {
    /// Suffix that turns a widget base name into its initializer name.
    pub init_suffix: String,
    /// Suffix tried first when deriving a handler class name.
    pub class_suffix: String,
    /// Maximum number of entries kept in the slot history.
    pub slot_history_limit: usize,
    /// Maximum number of entries kept in the UI history.
    pub ui_history_limit: usize,
    /// Load every source the loader lists when the switchboard is built.
    pub preload_ui: bool,
    /// Record widgets whose type has no signal table entry as bind failures,
    /// even when they have no handler.
    pub strict_widget_types: bool,
}

impl Default for SwitchboardConfig {
    fn default() -> Self {
        Self {
            init_suffix: DEFAULT_INIT_SUFFIX.to_owned(),
            class_suffix: DEFAULT_CLASS_SUFFIX.to_owned(),
            slot_history_limit: DEFAULT_HISTORY_LIMIT,
            ui_history_limit: DEFAULT_HISTORY_LIMIT,
            preload_ui: false,
            strict_widget_types: false,
        }
    }
}

impl SwitchboardConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initializer suffix (builder).
    pub fn with_init_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.init_suffix = suffix.into();
        self
    }

    /// Set the handler class suffix (builder).
    pub fn with_class_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.class_suffix = suffix.into();
        self
    }

    /// Set the slot history bound (builder).
    pub fn with_slot_history_limit(mut self, limit: usize) -> Self {
        self.slot_history_limit = limit;
        self
    }

    /// Set the UI history bound (builder).
    pub fn with_ui_history_limit(mut self, limit: usize) -> Self {
        self.ui_history_limit = limit;
        self
    }

    /// Enable or disable preloading (builder).
    pub fn with_preload_ui(mut self, preload: bool) -> Self {
        self.preload_ui = preload;
        self
    }

    /// Enable or disable strict widget type checking (builder).
    pub fn with_strict_widget_types(mut self, strict: bool) -> Self {
        self.strict_widget_types = strict;
        self
    }

    /// Initializer method name for a widget base name.
    pub fn init_method_name(&self, base_name: &str) -> String {
        format!("{base_name}{}", self.init_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SwitchboardConfig::new();
        assert_eq!(config.init_suffix, "_init");
        assert_eq!(config.class_suffix, "Slots");
        assert_eq!(config.slot_history_limit, 200);
        assert_eq!(config.ui_history_limit, 200);
        assert!(!config.preload_ui);
        assert!(!config.strict_widget_types);
    }

    #[test]
    fn builder() {
        let config = SwitchboardConfig::new()
            .with_init_suffix("_setup")
            .with_class_suffix("Handlers")
            .with_slot_history_limit(5)
            .with_ui_history_limit(3)
            .with_preload_ui(true)
            .with_strict_widget_types(true);
        assert_eq!(config.init_method_name("save_btn"), "save_btn_setup");
        assert_eq!(config.class_suffix, "Handlers");
        assert_eq!(config.slot_history_limit, 5);
        assert_eq!(config.ui_history_limit, 3);
        assert!(config.preload_ui);
        assert!(config.strict_widget_types);
    }
}

//! Trigger resolution: which mouse buttons activate a menu surface.
//!
//! A [`Trigger`] is a small value type with two mutually-deriving views,
//! [`Trigger::mode`] and [`Trigger::buttons`]. Setting either one
//! re-derives the other, so the two can never disagree.
//!
//! | state                  | `mode()`        | `buttons()`      |
//! |------------------------|-----------------|------------------|
//! | `Unrestricted`         | `None` ("none") | `None` (any)     |
//! | `Named(m)`             | `Some(m)`       | `Some(m.buttons())` |
//! | `Explicit(set)`        | `None` ("none") | `Some(set)`      |

use std::fmt;
use std::str::FromStr;

use crate::input::{ButtonId, ButtonSet};

/// Name that selects the unrestricted trigger.
pub const NONE_MODE: &str = "none";

// ---------------------------------------------------------------------------
// TriggerMode
// ---------------------------------------------------------------------------

/// A named trigger mode with a fixed button set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerMode {
    Left,
    Right,
    Middle,
}

impl TriggerMode {
    pub const ALL: [TriggerMode; 3] = [TriggerMode::Left, TriggerMode::Right, TriggerMode::Middle];

    /// Substituted for unrecognized mode names. Maps to a single button and
    /// never to the unrestricted trigger.
    pub const SAFE_DEFAULT: TriggerMode = TriggerMode::Right;

    pub fn name(self) -> &'static str {
        match self {
            TriggerMode::Left => "left",
            TriggerMode::Right => "right",
            TriggerMode::Middle => "middle",
        }
    }

    /// The button set this mode stands for.
    pub fn buttons(self) -> ButtonSet {
        match self {
            TriggerMode::Left => ButtonSet::single(ButtonId::Left),
            TriggerMode::Right => ButtonSet::single(ButtonId::Right),
            TriggerMode::Middle => ButtonSet::single(ButtonId::Middle),
        }
    }

    /// The mode whose button set equals `set` exactly.
    pub fn from_buttons(set: ButtonSet) -> Option<TriggerMode> {
        Self::ALL.into_iter().find(|m| m.buttons() == set)
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mode name outside `left`, `right`, `middle`, `none`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trigger mode {0:?}")]
pub struct UnknownTriggerMode(pub String);

impl FromStr for TriggerMode {
    type Err = UnknownTriggerMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .ok_or_else(|| UnknownTriggerMode(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// Resolved trigger of a menu surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Any button activates the surface.
    Unrestricted,
    /// A named mode and its fixed button set.
    Named(TriggerMode),
    /// An explicit button set with no named counterpart.
    Explicit(ButtonSet),
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::Named(TriggerMode::SAFE_DEFAULT)
    }
}

impl Trigger {
    /// Resolve a configuration value. `None` means "not configured" and
    /// yields the safe default; see [`set_mode_name`](Self::set_mode_name)
    /// for how names are handled.
    pub fn from_config(mode: Option<&str>) -> Self {
        let mut trigger = Trigger::default();
        if let Some(name) = mode {
            trigger.set_mode_name(name);
        }
        trigger
    }

    /// Trigger for an explicit button set, normalized to a named mode when
    /// one matches.
    pub fn from_buttons(set: ButtonSet) -> Self {
        let mut trigger = Trigger::Unrestricted;
        trigger.set_buttons(Some(set));
        trigger
    }

    /// The named mode, or `None` when no named mode applies.
    pub fn mode(&self) -> Option<TriggerMode> {
        match self {
            Trigger::Named(mode) => Some(*mode),
            Trigger::Unrestricted | Trigger::Explicit(_) => None,
        }
    }

    /// The mode as a configuration string (`"none"` when no named mode
    /// applies).
    pub fn mode_name(&self) -> &'static str {
        self.mode().map_or(NONE_MODE, TriggerMode::name)
    }

    /// The activating buttons, or `None` for unrestricted.
    pub fn buttons(&self) -> Option<ButtonSet> {
        match self {
            Trigger::Unrestricted => None,
            Trigger::Named(mode) => Some(mode.buttons()),
            Trigger::Explicit(set) => Some(*set),
        }
    }

    /// Set the named mode. `None` selects the unrestricted trigger.
    pub fn set_mode(&mut self, mode: Option<TriggerMode>) {
        *self = match mode {
            Some(mode) => Trigger::Named(mode),
            None => Trigger::Unrestricted,
        };
    }

    /// Set the mode by name. `"none"` selects the unrestricted trigger.
    ///
    /// Unrecognized names never fail: a warning is logged and
    /// [`TriggerMode::SAFE_DEFAULT`] is used.
    pub fn set_mode_name(&mut self, name: &str) {
        if name.trim().eq_ignore_ascii_case(NONE_MODE) {
            self.set_mode(None);
            return;
        }
        match name.parse::<TriggerMode>() {
            Ok(mode) => self.set_mode(Some(mode)),
            Err(err) => {
                log::warn!(
                    "{err}; falling back to {:?}",
                    TriggerMode::SAFE_DEFAULT.name()
                );
                self.set_mode(Some(TriggerMode::SAFE_DEFAULT));
            }
        }
    }

    /// Set the activating buttons. `None` selects the unrestricted trigger;
    /// a set equal to a named mode's set becomes that mode.
    pub fn set_buttons(&mut self, buttons: Option<ButtonSet>) {
        *self = match buttons {
            None => Trigger::Unrestricted,
            Some(set) => match TriggerMode::from_buttons(set) {
                Some(mode) => Trigger::Named(mode),
                None => Trigger::Explicit(set),
            },
        };
    }

    /// Whether `button` activates the surface.
    ///
    /// Every activation path (live input monitors and programmatic
    /// triggering) goes through this predicate.
    pub fn should_trigger(&self, button: ButtonId) -> bool {
        match self.buttons() {
            None => true,
            Some(set) => set.contains(button),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Unrestricted => f.write_str("any button"),
            Trigger::Named(mode) => write!(f, "{mode}"),
            Trigger::Explicit(set) => write!(f, "{set}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::capture_logs;

    // ── Mode <-> buttons ─────────────────────────────────────────────

    #[test]
    fn mode_round_trip() {
        let mut trigger = Trigger::Unrestricted;
        trigger.set_mode_name("left");
        assert_eq!(trigger.buttons(), Some(ButtonSet::single(ButtonId::Left)));

        let mut other = Trigger::Unrestricted;
        other.set_buttons(trigger.buttons());
        assert_eq!(other.mode(), Some(TriggerMode::Left));
        assert_eq!(other.mode_name(), "left");
    }

    #[test]
    fn every_mode_round_trips() {
        for mode in TriggerMode::ALL {
            let trigger = Trigger::from_buttons(mode.buttons());
            assert_eq!(trigger, Trigger::Named(mode));
        }
    }

    #[test]
    fn explicit_set_without_mode() {
        let set = ButtonSet::from_iter([ButtonId::Left, ButtonId::Right]);
        let trigger = Trigger::from_buttons(set);
        assert_eq!(trigger.mode(), None);
        assert_eq!(trigger.mode_name(), "none");
        assert_eq!(trigger.buttons(), Some(set));
        assert!(trigger.should_trigger(ButtonId::Left));
        assert!(trigger.should_trigger(ButtonId::Right));
        assert!(!trigger.should_trigger(ButtonId::Middle));
    }

    #[test]
    fn none_is_unrestricted() {
        let mut trigger = Trigger::default();
        trigger.set_mode_name("NONE");
        assert_eq!(trigger, Trigger::Unrestricted);
        assert_eq!(trigger.buttons(), None);
        for button in ButtonId::ALL {
            assert!(trigger.should_trigger(button));
        }
    }

    #[test]
    fn set_buttons_none_is_unrestricted() {
        let mut trigger = Trigger::Named(TriggerMode::Left);
        trigger.set_buttons(None);
        assert_eq!(trigger, Trigger::Unrestricted);
    }

    #[test]
    fn empty_set_never_triggers() {
        let trigger = Trigger::from_buttons(ButtonSet::EMPTY);
        assert_eq!(trigger, Trigger::Explicit(ButtonSet::EMPTY));
        assert!(ButtonId::ALL.iter().all(|&b| !trigger.should_trigger(b)));
    }

    // ── Invalid modes ────────────────────────────────────────────────

    #[test]
    fn bogus_mode_warns_and_falls_back() {
        let (trigger, logs) = capture_logs(|| {
            let mut trigger = Trigger::Unrestricted;
            trigger.set_mode_name("bogus");
            trigger
        });
        assert_eq!(trigger.mode(), Some(TriggerMode::SAFE_DEFAULT));
        assert_eq!(trigger.buttons(), Some(TriggerMode::SAFE_DEFAULT.buttons()));
        assert!(logs.contains_warning("bogus"));
    }

    #[test]
    fn config_resolution() {
        assert_eq!(Trigger::from_config(None), Trigger::Named(TriggerMode::Right));
        assert_eq!(Trigger::from_config(Some("none")), Trigger::Unrestricted);
        assert_eq!(
            Trigger::from_config(Some(" Middle ")),
            Trigger::Named(TriggerMode::Middle)
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "sideways".parse::<TriggerMode>(),
            Err(UnknownTriggerMode("sideways".into()))
        );
    }

    // ── Predicate ────────────────────────────────────────────────────

    #[test]
    fn named_mode_predicate() {
        let trigger = Trigger::Named(TriggerMode::Right);
        assert!(trigger.should_trigger(ButtonId::Right));
        assert!(!trigger.should_trigger(ButtonId::Left));
    }

    #[test]
    fn display() {
        assert_eq!(Trigger::Unrestricted.to_string(), "any button");
        assert_eq!(Trigger::Named(TriggerMode::Left).to_string(), "left");
    }
}

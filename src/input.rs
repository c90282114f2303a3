//! Mouse input types, decoupled from the terminal backend.
//!
//! Defines [`ButtonId`], [`ButtonSet`], [`MouseAction`] and [`MouseEvent`].
//! Crossterm events convert via `From` so monitors and menus never depend on
//! crossterm directly.

use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// ButtonId
// ---------------------------------------------------------------------------

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ButtonId {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

impl ButtonId {
    pub const ALL: [ButtonId; 5] = [
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::Middle,
        ButtonId::Back,
        ButtonId::Forward,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            ButtonId::Left => "left",
            ButtonId::Right => "right",
            ButtonId::Middle => "middle",
            ButtonId::Back => "back",
            ButtonId::Forward => "forward",
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A button name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mouse button {0:?}")]
pub struct UnknownButton(pub String);

impl FromStr for ButtonId {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ButtonId::ALL
            .into_iter()
            .find(|b| b.name() == wanted)
            .ok_or_else(|| UnknownButton(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// ButtonSet
// ---------------------------------------------------------------------------

/// A set of mouse buttons (bitmask).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ButtonSet(u8);

impl ButtonSet {
    pub const EMPTY: ButtonSet = ButtonSet(0);

    /// A set holding exactly one button.
    pub fn single(button: ButtonId) -> Self {
        ButtonSet(button.bit())
    }

    pub fn contains(self, button: ButtonId) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn insert(&mut self, button: ButtonId) {
        self.0 |= button.bit();
    }

    pub fn remove(&mut self, button: ButtonId) {
        self.0 &= !button.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// The button if this set holds exactly one.
    pub fn as_single(self) -> Option<ButtonId> {
        if self.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }

    pub fn iter(self) -> impl Iterator<Item = ButtonId> {
        ButtonId::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl From<ButtonId> for ButtonSet {
    fn from(button: ButtonId) -> Self {
        ButtonSet::single(button)
    }
}

impl FromIterator<ButtonId> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = ButtonId>>(iter: I) -> Self {
        let mut set = ButtonSet::EMPTY;
        for b in iter {
            set.insert(b);
        }
        set
    }
}

impl BitOr for ButtonSet {
    type Output = ButtonSet;
    fn bitor(self, rhs: Self) -> Self::Output {
        ButtonSet(self.0 | rhs.0)
    }
}

impl BitAnd for ButtonSet {
    type Output = ButtonSet;
    fn bitand(self, rhs: Self) -> Self::Output {
        ButtonSet(self.0 & rhs.0)
    }
}

impl fmt::Display for ButtonSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, b) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(b.name())?;
        }
        f.write_str("}")
    }
}

// ---------------------------------------------------------------------------
// MouseAction / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(ButtonId),
    Up(ButtonId),
    Drag(ButtonId),
    Moved,
    Scroll,
}

/// A low-level mouse event as seen by an input monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: u16,
    pub y: u16,
}

impl MouseEvent {
    /// A button press at `(x, y)`.
    pub fn press(button: ButtonId, x: u16, y: u16) -> Self {
        Self {
            kind: MouseAction::Down(button),
            x,
            y,
        }
    }

    /// The pressed button, for `Down` events.
    pub fn pressed(&self) -> Option<ButtonId> {
        match self.kind {
            MouseAction::Down(b) => Some(b),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

impl From<crossterm::event::MouseButton> for ButtonId {
    fn from(b: crossterm::event::MouseButton) -> Self {
        match b {
            crossterm::event::MouseButton::Left => ButtonId::Left,
            crossterm::event::MouseButton::Right => ButtonId::Right,
            crossterm::event::MouseButton::Middle => ButtonId::Middle,
        }
    }
}

impl From<crossterm::event::MouseEvent> for MouseEvent {
    fn from(me: crossterm::event::MouseEvent) -> Self {
        use crossterm::event::MouseEventKind;
        let kind = match me.kind {
            MouseEventKind::Down(b) => MouseAction::Down(b.into()),
            MouseEventKind::Up(b) => MouseAction::Up(b.into()),
            MouseEventKind::Drag(b) => MouseAction::Drag(b.into()),
            MouseEventKind::Moved => MouseAction::Moved,
            _ => MouseAction::Scroll,
        };
        MouseEvent {
            kind,
            x: me.column,
            y: me.row,
        }
    }
}

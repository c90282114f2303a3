//! Pilot: drive a switchboard against a [`FakeToolkit`] by widget name.
//!
//! The `Pilot` owns the toolkit and the switchboard built on it, and offers
//! name-based helpers for what a user would do: click a button, type into a
//! field, right-click a widget to open its menu.
//!
//! # Examples
//!
//! ```ignore
//! use switchboard::testing::{FakeToolkit, Pilot};
//! use switchboard::Switchboard;
//!
//! let toolkit = FakeToolkit::new();
//! toolkit.add_ui("main", &[("main_window", "MainWindow"), ("save_btn", "PushButton")]);
//! let pilot = Pilot::start(toolkit, Switchboard::builder().register(slots())).unwrap();
//! pilot.click("main", "save_btn");
//! ```

use std::rc::Rc;

use crate::error::Result;
use crate::handler::SlotCall;
use crate::input::ButtonId;
use crate::signal::EventValue;
use crate::switchboard::{Switchboard, SwitchboardBuilder};
use crate::toolkit::WidgetHandle;
use crate::ui::Ui;

use super::fake::FakeToolkit;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless switchboard driver for tests.
pub struct Pilot {
    toolkit: Rc<FakeToolkit>,
    switchboard: Switchboard,
}

impl Pilot {
    /// Build `builder` with `toolkit` as every collaborator.
    pub fn start(toolkit: FakeToolkit, builder: SwitchboardBuilder) -> Result<Self> {
        let toolkit = Rc::new(toolkit);
        let switchboard = builder.toolkit(toolkit.clone()).build()?;
        Ok(Self {
            toolkit,
            switchboard,
        })
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn switchboard(&self) -> &Switchboard {
        &self.switchboard
    }

    pub fn toolkit(&self) -> &FakeToolkit {
        &self.toolkit
    }

    /// The UI named `name`, loading it on first access.
    pub fn ui(&self, name: &str) -> Result<Rc<Ui>> {
        self.switchboard.get_ui(name)
    }

    pub fn slot_history(&self) -> Vec<SlotCall> {
        self.switchboard.slot_history()
    }

    fn handle(&self, ui: &str, widget: &str) -> Option<WidgetHandle> {
        self.ui(ui).ok()?.handle_of(widget)
    }

    // ── Signals ──────────────────────────────────────────────────────

    /// Emit `signal` on a widget. `None` when the UI or widget is unknown;
    /// otherwise the number of callbacks that ran.
    pub fn emit(&self, ui: &str, widget: &str, signal: &str, values: &[EventValue]) -> Option<usize> {
        let handle = self.handle(ui, widget)?;
        Some(self.toolkit.emit(handle, signal, values))
    }

    /// Emit the default signal of the widget's type with `values`.
    pub fn activate(&self, ui: &str, widget: &str, values: &[EventValue]) -> Option<usize> {
        let record = self.ui(ui).ok()?.widget(widget)?;
        let binding = self
            .switchboard
            .policy()
            .default_signal_for(record.widget_type())
            .ok()?;
        Some(self.toolkit.emit(record.handle(), binding.name, values))
    }

    /// Click a button: emit `clicked` with an unchecked state.
    pub fn click(&self, ui: &str, widget: &str) -> Option<usize> {
        self.emit(ui, widget, "clicked", &[EventValue::Bool(false)])
    }

    /// Type `text` into a field one character at a time, emitting
    /// `text-changed` with the accumulated text after each one.
    pub fn type_text(&self, ui: &str, widget: &str, text: &str) -> Option<usize> {
        let handle = self.handle(ui, widget)?;
        let mut typed = String::new();
        let mut calls = 0;
        for c in text.chars() {
            typed.push(c);
            calls += self
                .toolkit
                .emit(handle, "text-changed", &[EventValue::Text(typed.clone())]);
        }
        Some(calls)
    }

    // ── Mouse ────────────────────────────────────────────────────────

    /// Press `button` on a widget. Returns whether a monitor consumed it.
    pub fn press(&self, ui: &str, widget: &str, button: ButtonId) -> bool {
        self.handle(ui, widget)
            .is_some_and(|h| self.toolkit.press(h, button, 0, 0))
    }

    pub fn right_click(&self, ui: &str, widget: &str) -> bool {
        self.press(ui, widget, ButtonId::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerClass;

    #[derive(Default)]
    struct Slots {
        clicks: u32,
        texts: Vec<String>,
    }

    fn slots() -> HandlerClass {
        HandlerClass::builder("MainSlots", |_| Slots::default())
            .method("save_btn", &[], |s: &mut Slots, _| {
                s.clicks += 1;
                Ok(())
            })
            .method_on("name_edit", &["text-changed"], &["text"], |s: &mut Slots, inv| {
                s.texts.push(inv.extract(0)?);
                Ok(())
            })
            .build()
    }

    fn pilot() -> Pilot {
        let toolkit = FakeToolkit::new();
        toolkit.add_ui(
            "main",
            &[
                ("main_window", "MainWindow"),
                ("save_btn", "PushButton"),
                ("name_edit", "LineEdit"),
            ],
        );
        Pilot::start(toolkit, Switchboard::builder().register(slots())).unwrap()
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn start_builds_switchboard() {
        let pilot = pilot();
        assert!(!pilot.switchboard().is_loaded("main"));
        assert_eq!(pilot.ui("main").unwrap().name(), "main");
    }

    // ── Click ────────────────────────────────────────────────────────

    #[test]
    fn click_runs_handler() {
        let pilot = pilot();
        assert_eq!(pilot.click("main", "save_btn"), Some(1));
        assert_eq!(pilot.activate("main", "save_btn", &[true.into()]), Some(1));
        let ui = pilot.ui("main").unwrap();
        assert_eq!(ui.with_handler(|s: &Slots| s.clicks), Some(2));
        assert_eq!(pilot.slot_history(), vec![SlotCall::new("main", "save_btn")]);
    }

    #[test]
    fn unknown_widget_is_none() {
        let pilot = pilot();
        assert_eq!(pilot.click("main", "nope"), None);
        assert_eq!(pilot.click("nope", "save_btn"), None);
    }

    // ── Type text ────────────────────────────────────────────────────

    #[test]
    fn type_text_accumulates() {
        let pilot = pilot();
        assert_eq!(pilot.type_text("main", "name_edit", "abc"), Some(3));
        let ui = pilot.ui("main").unwrap();
        assert_eq!(
            ui.with_handler(|s: &Slots| s.texts.clone()),
            Some(vec!["a".to_owned(), "ab".to_owned(), "abc".to_owned()])
        );
    }

    // ── Mouse ────────────────────────────────────────────────────────

    #[test]
    fn right_click_opens_context_menu() {
        let pilot = pilot();
        let ui = pilot.ui("main").unwrap();
        assert!(!pilot.right_click("main", "save_btn"));
        let menu = ui.menu("save_btn").unwrap();
        menu.add_item("Save as");
        assert!(pilot.right_click("main", "save_btn"));
        assert!(menu.is_visible());
        assert!(!pilot.press("main", "save_btn", ButtonId::Left));
    }
}

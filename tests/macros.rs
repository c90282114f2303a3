//! `#[handlers]` end to end: derive a class, bind it, dispatch signals.

use std::rc::Rc;

use switchboard::handler::{Handlers, InvokeError};
use switchboard::testing::FakeToolkit;
use switchboard::ui::Ui;
use switchboard::{handlers, LoadedTree, Switchboard, WeakSwitchboard, WidgetHandle};

struct MainSlots {
    sb: WeakSwitchboard,
    saves: Vec<bool>,
    texts: Vec<String>,
    rows: Vec<i64>,
    initialized: Vec<WidgetHandle>,
}

#[handlers]
impl MainSlots {
    fn new(sb: &Switchboard) -> Self {
        Self {
            sb: sb.downgrade(),
            saves: Vec::new(),
            texts: Vec::new(),
            rows: Vec::new(),
            initialized: Vec::new(),
        }
    }

    fn save_btn(&mut self, state: bool) {
        self.saves.push(state);
    }

    fn save_btn_init(&mut self, widget: WidgetHandle) {
        self.initialized.push(widget);
    }

    #[signals("text-changed", "enter-pressed")]
    fn search_box(&mut self, ui: Rc<Ui>) -> Result<(), InvokeError> {
        let text = format!("{}:{}", ui.name(), self.sb.upgrade().is_some());
        self.texts.push(text);
        Ok(())
    }

    fn mode_combo(&mut self, _index: i64) {
        self.rows.push(_index);
    }

    #[skip]
    fn total(&self) -> usize {
        self.saves.len() + self.texts.len()
    }
}

#[derive(Default)]
struct PrefsSlots {
    applied: u32,
}

#[handlers(name = "PrefsSlots")]
impl PrefsSlots {
    fn apply_btn(&mut self) {
        self.applied += 1;
    }
}

fn toolkit() -> Rc<FakeToolkit> {
    let toolkit = Rc::new(FakeToolkit::new());
    toolkit.add_source(
        "main",
        LoadedTree::new()
            .with_widget("save_btn", "PushButton", WidgetHandle(1))
            .with_widget("search_box", "LineEdit", WidgetHandle(2))
            .with_widget("mode_combo", "ComboBox", WidgetHandle(3)),
    );
    toolkit.add_source(
        "prefs",
        LoadedTree::new().with_widget("apply_btn", "PushButton", WidgetHandle(10)),
    );
    toolkit
}

#[test]
fn test_derived_class_descriptor() {
    let class = MainSlots::handler_class();
    assert_eq!(class.name(), "MainSlots");
    assert_eq!(
        class.method_names(),
        vec!["mode_combo", "save_btn", "save_btn_init", "search_box"]
    );
    let search = class.method("search_box").unwrap();
    assert_eq!(search.params(), &["ui".to_owned()]);
    assert_eq!(
        search.signals(),
        Some(&["text-changed".to_owned(), "enter-pressed".to_owned()][..])
    );
    assert!(!class.has_method("total"));
}

#[test]
fn test_derived_class_binds_and_dispatches() {
    let toolkit = toolkit();
    let sb = Switchboard::builder()
        .toolkit(toolkit.clone())
        .register_type::<MainSlots>()
        .build()
        .unwrap();
    let ui = sb.get_ui("main").unwrap();
    assert!(ui.last_report().is_clean());

    toolkit.emit(WidgetHandle(1), "clicked", &[true.into()]);
    toolkit.emit(WidgetHandle(2), "text-changed", &["q".into()]);
    toolkit.emit(WidgetHandle(2), "enter-pressed", &[]);
    toolkit.emit(WidgetHandle(3), "current-index-changed", &[2_i64.into()]);

    let state = ui
        .with_handler(|s: &MainSlots| {
            (s.saves.clone(), s.texts.clone(), s.initialized.clone(), s.rows.clone(), s.total())
        })
        .unwrap();
    assert_eq!(state.0, vec![true]);
    assert_eq!(state.1, vec!["main:true".to_owned(), "main:true".to_owned()]);
    assert_eq!(state.2, vec![WidgetHandle(1)]);
    assert_eq!(state.3, vec![2]);
    assert_eq!(state.4, 3);
}

#[test]
fn test_default_constructor_and_explicit_name() {
    let toolkit = toolkit();
    let sb = Switchboard::builder()
        .toolkit(toolkit.clone())
        .register_type::<PrefsSlots>()
        .build()
        .unwrap();
    let prefs = sb.get_ui("prefs").unwrap();
    toolkit.emit(WidgetHandle(10), "clicked", &[false.into()]);
    toolkit.emit(WidgetHandle(10), "clicked", &[false.into()]);
    assert_eq!(prefs.with_handler(|s: &PrefsSlots| s.applied), Some(2));
}

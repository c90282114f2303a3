//! The bind pass over one UI instance.
//!
//! No registry or plan-cache borrow is held while handler code runs: the
//! pass reads what it needs, releases the borrow, connects or invokes, then
//! writes the result back.

use std::rc::Rc;

use super::{BindError, BindReport};
use crate::handler::inspect::CallContext;
use crate::handler::{CallPlan, Invocation, Method, SlotCall};
use crate::registry::{BindState, WidgetKey};
use crate::signal::{EventValue, ParamKind};
use crate::switchboard::Switchboard;
use crate::toolkit::{ConnectionId, SignalCallback, WidgetHandle};
use crate::ui::Ui;

/// A signal resolved for one widget, with the values it delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedSignal {
    name: String,
    shape: Vec<ParamKind>,
}

/// Snapshot of the record fields the pass needs.
struct Pending {
    name: String,
    base_name: String,
    widget_type: String,
    handle: WidgetHandle,
    initialized: bool,
}

/// Bind every widget of `ui` that is not connected yet.
///
/// Initializers run at most once per widget over the UI's lifetime, so a
/// later pass (after [`disconnect_ui`]) only reconnects signals.
pub fn bind_ui(sb: &Switchboard, ui: &Rc<Ui>) -> BindReport {
    let keys = ui.registry().keys();
    run_pass(sb, ui, keys, None)
}

/// Bind the widgets of `ui` matching `pattern` (see
/// [`unpack_names`](crate::naming::unpack_names)) that are not connected.
pub fn bind_widgets(sb: &Switchboard, ui: &Rc<Ui>, pattern: &str) -> BindReport {
    let keys = ui.registry().matching_keys(pattern);
    run_pass(sb, ui, keys, None)
}

/// Rebind the widget `key` to the handler method `slot`, or to the method
/// named after its base name when `slot` is `None`. Existing connections of
/// the widget are removed first.
pub fn bind_slot(sb: &Switchboard, ui: &Rc<Ui>, key: WidgetKey, slot: Option<&str>) -> BindReport {
    disconnect_keys(sb, ui, &[key]);
    run_pass(sb, ui, vec![key], slot)
}

fn run_pass(sb: &Switchboard, ui: &Rc<Ui>, keys: Vec<WidgetKey>, slot: Option<&str>) -> BindReport {
    let mut report = BindReport::new(ui.name());
    if ui.is_released() {
        log::debug!("UI {} was torn down, not binding", ui.name());
        return report;
    }
    for key in keys {
        // Handler code may tear the UI down mid-pass.
        if ui.is_released() {
            break;
        }
        bind_widget(sb, ui, key, slot, &mut report);
    }
    *ui.last_report.borrow_mut() = report.clone();
    report.log();
    report
}

/// Disconnect every connection the bind passes made on `ui`. Returns the
/// number of connections removed.
pub fn disconnect_ui(sb: &Switchboard, ui: &Ui) -> usize {
    let keys = ui.registry().keys();
    let removed = disconnect_keys(sb, ui, &keys);
    log::debug!("disconnected {removed} signal(s) of UI {}", ui.name());
    removed
}

/// Disconnect the widgets of `ui` matching `pattern`. Returns the number of
/// connections removed.
pub fn disconnect_widgets(sb: &Switchboard, ui: &Ui, pattern: &str) -> usize {
    let keys = ui.registry().matching_keys(pattern);
    let removed = disconnect_keys(sb, ui, &keys);
    log::debug!("disconnected {removed} signal(s) of {pattern:?} in UI {}", ui.name());
    removed
}

fn disconnect_keys(sb: &Switchboard, ui: &Ui, keys: &[WidgetKey]) -> usize {
    let stale: Vec<ConnectionId> = {
        let mut registry = ui.registry_mut();
        let mut stale = Vec::new();
        for &key in keys {
            let Some(record) = registry.by_key_mut(key) else {
                continue;
            };
            stale.extend_from_slice(record.connections());
            record.mark_disconnected();
        }
        stale
    };
    for id in &stale {
        sb.connector().disconnect(*id);
    }
    stale.len()
}

fn bind_widget(
    sb: &Switchboard,
    ui: &Rc<Ui>,
    key: WidgetKey,
    slot: Option<&str>,
    report: &mut BindReport,
) {
    let pending = {
        let registry = ui.registry();
        let Some(record) = registry.by_key(key) else {
            return;
        };
        if record.is_connected() {
            report.already_connected += 1;
            return;
        }
        Pending {
            name: record.name().to_owned(),
            base_name: record.base_name().to_owned(),
            widget_type: record.widget_type().to_owned(),
            handle: record.handle(),
            initialized: record.is_initialized(),
        }
    };

    let method_name = slot.unwrap_or(pending.base_name.as_str());
    let method = ui.handler().and_then(|h| h.method(method_name)).cloned();
    let init = ui
        .handler()
        .and_then(|h| h.method(&sb.config().init_method_name(&pending.base_name)))
        .cloned();

    let Some(method) = method else {
        if let Some(slot) = slot {
            let err = BindError::UnknownSlot(slot.to_owned());
            record_failure(sb, ui, key, &pending.name, err, report);
            return;
        }
        update(ui, key, |r| {
            r.handler = None;
            r.state = BindState::NoHandler;
        });
        report.without_handler += 1;
        if sb.config().strict_widget_types {
            if let Err(err) = sb.policy().default_signal_for(&pending.widget_type) {
                record_failure(sb, ui, key, &pending.name, err.into(), report);
                return;
            }
        }
        run_init_once(sb, ui, key, &pending, init.as_deref(), report);
        return;
    };

    update(ui, key, |r| {
        r.handler = Some(Rc::clone(&method));
        r.state = BindState::HandlerResolved;
    });

    let signals = match resolve_signals(sb, &method, &pending.widget_type) {
        Ok(signals) => signals,
        Err(err) => {
            record_failure(sb, ui, key, &pending.name, err, report);
            return;
        }
    };
    update(ui, key, |r| r.state = BindState::SignalResolved);

    let mut plans = Vec::with_capacity(signals.len());
    for signal in &signals {
        let plan = ui.plans.borrow_mut().plan_for(&method, &signal.shape);
        match plan {
            Ok(plan) => plans.push(plan),
            Err(err) => {
                record_failure(sb, ui, key, &pending.name, err.into(), report);
                return;
            }
        }
    }

    let mut connections: Vec<ConnectionId> = Vec::with_capacity(signals.len());
    for (signal, plan) in signals.iter().zip(&plans) {
        let callback = signal_callback(sb, ui, &method, plan, signal, pending.handle);
        match sb.connector().connect(pending.handle, &signal.name, callback) {
            Ok(id) => {
                log::trace!("connected {}.{} -> {}", pending.name, signal.name, method.name());
                connections.push(id);
            }
            Err(err) => {
                for id in connections {
                    sb.connector().disconnect(id);
                }
                record_failure(sb, ui, key, &pending.name, err.into(), report);
                return;
            }
        }
    }

    let plan = plans.first().cloned();
    update(ui, key, |r| {
        r.plan = plan;
        r.bound_signals = signals.iter().map(|s| s.name.clone()).collect();
        r.connections = connections;
        r.error = None;
        r.state = BindState::Bound;
    });
    report.bound += 1;

    if !run_init_once(sb, ui, key, &pending, init.as_deref(), report) || ui.is_released() {
        return;
    }
    update(ui, key, |r| {
        r.is_connected = true;
        if r.is_initialized && r.state == BindState::Bound {
            r.state = BindState::Initialized;
        }
    });
}

/// Signals for `method` on a widget of `widget_type`: the override list
/// when the method carries one, else the type's default signal.
fn resolve_signals(
    sb: &Switchboard,
    method: &Method,
    widget_type: &str,
) -> Result<Vec<ResolvedSignal>, BindError> {
    let policy = sb.policy();
    match method.signals() {
        Some(names) if !names.is_empty() => Ok(names
            .iter()
            .map(|name| ResolvedSignal {
                name: name.clone(),
                shape: policy
                    .shape_of(widget_type, name)
                    .map(<[ParamKind]>::to_vec)
                    .unwrap_or_default(),
            })
            .collect()),
        _ => {
            let binding = policy
                .default_signal_for(widget_type)
                .map_err(|_| BindError::NoResolvableSignal {
                    widget_type: widget_type.to_owned(),
                })?;
            Ok(vec![ResolvedSignal {
                name: binding.name.to_owned(),
                shape: binding.shape.to_vec(),
            }])
        }
    }
}

/// Run the widget's initializer if it has one and it has not run yet.
/// Returns `false` when the initializer failed.
fn run_init_once(
    sb: &Switchboard,
    ui: &Rc<Ui>,
    key: WidgetKey,
    pending: &Pending,
    init: Option<&Method>,
    report: &mut BindReport,
) -> bool {
    let Some(init) = init else {
        return true;
    };
    if pending.initialized {
        return true;
    }
    // Mark first so a handler that re-enters the pass cannot run it twice.
    update(ui, key, |r| r.is_initialized = true);

    let plan = ui.plans.borrow_mut().plan_for(init, &[]);
    let result = match plan {
        Ok(plan) => invoke(sb, ui, init, &plan, &[], &[], pending.handle).map_err(BindError::from),
        Err(err) => Err(err.into()),
    };
    match result {
        Ok(()) => {
            report.initialized += 1;
            true
        }
        Err(err) => {
            record_failure(sb, ui, key, &pending.name, err, report);
            false
        }
    }
}

fn signal_callback(
    sb: &Switchboard,
    ui: &Rc<Ui>,
    method: &Rc<Method>,
    plan: &Rc<CallPlan>,
    signal: &ResolvedSignal,
    handle: WidgetHandle,
) -> SignalCallback {
    let sb = sb.downgrade();
    let ui = Rc::downgrade(ui);
    let method = Rc::clone(method);
    let plan = Rc::clone(plan);
    let shape = signal.shape.clone();
    Rc::new(move |values: &[EventValue]| {
        let (Some(sb), Some(ui)) = (sb.upgrade(), ui.upgrade()) else {
            return;
        };
        if let Err(err) = invoke(&sb, &ui, &method, &plan, &shape, values, handle) {
            log::error!("UI {}: {err}", ui.name());
        }
    })
}

/// Invoke `method` on the UI's handler instance through `plan`.
fn invoke(
    sb: &Switchboard,
    ui: &Rc<Ui>,
    method: &Method,
    plan: &CallPlan,
    shape: &[ParamKind],
    values: &[EventValue],
    handle: WidgetHandle,
) -> Result<(), crate::handler::InvokeError> {
    let Some(handler) = ui.handler() else {
        return Ok(());
    };
    let ctx = CallContext {
        widget: handle,
        ui,
        switchboard: sb,
    };
    let args = plan.arguments(shape, values, &ctx)?;
    sb.record_slot(SlotCall::new(ui.name(), method.name()));
    handler.invoke(method, &Invocation::new(method.name(), args))
}

fn update(ui: &Ui, key: WidgetKey, f: impl FnOnce(&mut crate::registry::WidgetRecord)) {
    if let Some(record) = ui.registry_mut().by_key_mut(key) {
        f(record);
    }
}

/// Record `error` on the widget and in the report. Connections already made
/// for the widget are removed; a failed widget stays unbound.
fn record_failure(
    sb: &Switchboard,
    ui: &Ui,
    key: WidgetKey,
    name: &str,
    error: BindError,
    report: &mut BindReport,
) {
    let mut stale = Vec::new();
    update(ui, key, |r| {
        stale = std::mem::take(&mut r.connections);
        r.fail(error.clone());
    });
    for id in stale {
        sb.connector().disconnect(id);
    }
    report.fail(name, error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerClass;
    use crate::testing::{capture_logs, FakeToolkit};
    use crate::toolkit::LoadedTree;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Slots {
        saves: Vec<bool>,
        inits: u32,
        searches: Vec<String>,
    }

    fn slots() -> HandlerClass {
        HandlerClass::builder("MainSlots", |_| Slots::default())
            .method("save_btn", &["state"], |s: &mut Slots, inv| {
                s.saves.push(inv.extract(0)?);
                Ok(())
            })
            .method("save_btn_init", &["widget"], |s: &mut Slots, _| {
                s.inits += 1;
                Ok(())
            })
            .method_on(
                "search_box",
                &["text-changed", "enter-pressed"],
                &["widget"],
                |s: &mut Slots, inv| {
                    s.searches.push(format!("{:?}", inv.widget()));
                    Ok(())
                },
            )
            .method("bad_btn", &["widgte"], |_: &mut Slots, _| Ok(()))
            .method("mystery", &[], |_: &mut Slots, _| Ok(()))
            .build()
    }

    fn tree() -> LoadedTree {
        LoadedTree::new()
            .with_widget("main_window", "MainWindow", WidgetHandle(1))
            .with_widget("save_btn", "PushButton", WidgetHandle(2))
            .with_widget("label1", "Label", WidgetHandle(3))
            .with_widget("search_box", "LineEdit", WidgetHandle(4))
            .with_widget("bad_btn", "PushButton", WidgetHandle(5))
            .with_widget("mystery", "FancyDial", WidgetHandle(6))
    }

    fn setup() -> (Rc<FakeToolkit>, Switchboard, Rc<Ui>) {
        let toolkit = Rc::new(FakeToolkit::new());
        toolkit.add_source("main", tree());
        let sb = Switchboard::builder()
            .toolkit(toolkit.clone())
            .register(slots())
            .build()
            .unwrap();
        let ui = sb.get_ui("main").unwrap();
        (toolkit, sb, ui)
    }

    // ── Pass results ─────────────────────────────────────────────────

    #[test]
    fn pass_binds_and_records_failures() {
        let (_toolkit, _sb, ui) = setup();
        let report = ui.last_report();
        assert_eq!(report.bound, 2);
        assert_eq!(report.initialized, 1);
        assert_eq!(report.without_handler, 2);
        assert_eq!(report.failures.len(), 2);
        assert!(matches!(
            report.failure("bad_btn"),
            Some(BindError::UnsupportedHandlerParameter(_))
        ));
        assert!(matches!(
            report.failure("mystery"),
            Some(BindError::NoResolvableSignal { .. })
        ));
    }

    #[test]
    fn record_states() {
        let (_toolkit, _sb, ui) = setup();
        let reg = ui.registry();
        assert_eq!(reg.get("save_btn").unwrap().state(), BindState::Initialized);
        assert_eq!(reg.get("search_box").unwrap().state(), BindState::Bound);
        assert_eq!(reg.get("label1").unwrap().state(), BindState::NoHandler);
        assert_eq!(reg.get("bad_btn").unwrap().state(), BindState::Failed);
        assert!(!reg.get("bad_btn").unwrap().is_connected());
        assert!(reg.get("label1").unwrap().handler_ref().is_none());
    }

    #[test]
    fn default_signal_invokes_handler_with_value() {
        let (toolkit, _sb, ui) = setup();
        assert_eq!(toolkit.emit(WidgetHandle(2), "clicked", &[true.into()]), 1);
        assert_eq!(toolkit.emit(WidgetHandle(2), "clicked", &[false.into()]), 1);
        assert_eq!(ui.with_handler(|s: &Slots| s.saves.clone()), Some(vec![true, false]));
    }

    #[test]
    fn override_binds_every_listed_signal() {
        let (toolkit, _sb, ui) = setup();
        let record = ui.widget("search_box").unwrap();
        assert_eq!(record.bound_signals(), &["text-changed", "enter-pressed"]);
        toolkit.emit(WidgetHandle(4), "text-changed", &["a".into()]);
        toolkit.emit(WidgetHandle(4), "enter-pressed", &[]);
        assert_eq!(
            ui.with_handler(|s: &Slots| s.searches.len()),
            Some(2)
        );
        assert_eq!(toolkit.emit(WidgetHandle(4), "editing-finished", &[]), 0);
    }

    #[test]
    fn batched_warning_after_pass() {
        let (_, logs) = capture_logs(|| {
            let _ = setup();
        });
        assert_eq!(logs.warnings().len(), 1);
        assert!(logs.contains_warning("bad_btn"));
        assert!(logs.contains_warning("mystery"));
    }

    // ── Reconnection ─────────────────────────────────────────────────

    #[test]
    fn disconnect_then_reconnect_keeps_init_single() {
        let (toolkit, sb, ui) = setup();
        assert_eq!(disconnect_ui(&sb, &ui), 3);
        assert_eq!(toolkit.emit(WidgetHandle(2), "clicked", &[true.into()]), 0);
        assert!(!ui.widget("save_btn").unwrap().is_connected());

        let report = bind_ui(&sb, &ui);
        assert_eq!(report.bound, 2);
        assert_eq!(report.initialized, 0);
        assert_eq!(ui.with_handler(|s: &Slots| s.inits), Some(1));
        assert_eq!(toolkit.emit(WidgetHandle(2), "clicked", &[true.into()]), 1);
    }

    #[test]
    fn second_pass_skips_connected() {
        let (toolkit, sb, ui) = setup();
        let before = toolkit.connection_count();
        let report = bind_ui(&sb, &ui);
        assert_eq!(report.bound, 0);
        assert_eq!(report.already_connected, 2);
        assert_eq!(toolkit.connection_count(), before);
    }

    #[test]
    fn connect_failure_rolls_back() {
        let toolkit = Rc::new(FakeToolkit::new());
        toolkit.refuse_signal("enter-pressed");
        toolkit.add_source("main", tree());
        let sb = Switchboard::builder()
            .toolkit(toolkit.clone())
            .register(slots())
            .build()
            .unwrap();
        let ui = sb.get_ui("main").unwrap();
        assert!(matches!(
            ui.last_report().failure("search_box"),
            Some(BindError::Connect(_))
        ));
        assert_eq!(toolkit.emit(WidgetHandle(4), "text-changed", &["a".into()]), 0);
    }

    #[test]
    fn failing_init_leaves_widget_unbound() {
        let toolkit = Rc::new(FakeToolkit::new());
        toolkit.add_source(
            "main",
            LoadedTree::new().with_widget("save_btn", "PushButton", WidgetHandle(1)),
        );
        let class = HandlerClass::builder("MainSlots", |_| ())
            .method("save_btn", &[], |_: &mut (), _| Ok(()))
            .method("save_btn_init", &["value"], |_: &mut (), _| Ok(()))
            .build();
        let sb = Switchboard::builder()
            .toolkit(toolkit.clone())
            .register(class)
            .build()
            .unwrap();
        let ui = sb.get_ui("main").unwrap();
        let record = ui.widget("save_btn").unwrap();
        assert_eq!(record.state(), BindState::Failed);
        assert!(!record.is_connected());
        assert_eq!(toolkit.connection_count(), 0);
    }

    #[test]
    fn strict_mode_flags_unmapped_types() {
        let toolkit = Rc::new(FakeToolkit::new());
        toolkit.add_source(
            "main",
            LoadedTree::new().with_widget("gauge", "FancyGauge", WidgetHandle(1)),
        );
        let sb = Switchboard::builder()
            .toolkit(toolkit)
            .config(crate::SwitchboardConfig::new().with_strict_widget_types(true))
            .build()
            .unwrap();
        let ui = sb.get_ui("main").unwrap();
        assert!(matches!(
            ui.last_report().failure("gauge"),
            Some(BindError::UnmappedWidgetType(_))
        ));
    }
}

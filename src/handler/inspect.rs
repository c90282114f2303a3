//! Handler signature inspection.
//!
//! A handler method declares parameter names; the inspector matches them
//! against the injection vocabulary once, at bind time, and produces a
//! [`CallPlan`] that maps each declared position to a runtime value. The
//! plan is cached per method for the lifetime of the UI instance.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::class::Method;
use super::invocation::{Arg, InvokeError};
use crate::signal::{EventValue, ParamKind};
use crate::switchboard::Switchboard;
use crate::toolkit::WidgetHandle;
use crate::ui::Ui;

/// Receiver name excluded from inspection.
pub const RECEIVER: &str = "self";

/// Parameter name of the originating widget.
pub const WIDGET_PARAM: &str = "widget";
/// Parameter name of the owning UI instance.
pub const UI_PARAM: &str = "ui";
/// Parameter name of the orchestrator.
pub const SWITCHBOARD_PARAM: &str = "sb";

/// What goes into one parameter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Injection {
    /// A value delivered by the emitting signal.
    Event(ParamKind),
    Widget,
    Ui,
    Switchboard,
}

impl Injection {
    /// Match a declared parameter name. A leading `_` is ignored.
    pub fn from_param(name: &str) -> Option<Injection> {
        let name = name.strip_prefix('_').unwrap_or(name);
        match name {
            WIDGET_PARAM => Some(Injection::Widget),
            UI_PARAM => Some(Injection::Ui),
            SWITCHBOARD_PARAM => Some(Injection::Switchboard),
            _ => ParamKind::from_param_name(name).map(Injection::Event),
        }
    }
}

impl fmt::Display for Injection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Injection::Event(kind) => write!(f, "{kind}"),
            Injection::Widget => f.write_str(WIDGET_PARAM),
            Injection::Ui => f.write_str(UI_PARAM),
            Injection::Switchboard => f.write_str(SWITCHBOARD_PARAM),
        }
    }
}

/// Why a parameter cannot be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// Outside the vocabulary.
    UnknownName,
    /// An event value the signal does not deliver.
    NotDelivered,
}

/// A handler declares a parameter that cannot be injected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedHandlerParameter {
    pub method: String,
    pub param: String,
    pub reason: Unsupported,
    /// The shape the signal delivers.
    pub available: Vec<ParamKind>,
}

impl fmt::Display for UnsupportedHandlerParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            Unsupported::UnknownName => write!(
                f,
                "handler {} declares unsupported parameter {:?}",
                self.method, self.param
            ),
            Unsupported::NotDelivered => {
                let available: Vec<&str> = self.available.iter().map(|k| k.param_name()).collect();
                write!(
                    f,
                    "handler {} asks for {:?}, signal delivers [{}]",
                    self.method,
                    self.param,
                    available.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for UnsupportedHandlerParameter {}

// ---------------------------------------------------------------------------
// CallPlan
// ---------------------------------------------------------------------------

/// Precomputed positional arguments of one handler method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPlan {
    method: String,
    params: Vec<String>,
    slots: Vec<Injection>,
}

/// Runtime values available to a call.
pub struct CallContext<'a> {
    pub widget: WidgetHandle,
    pub ui: &'a Rc<Ui>,
    pub switchboard: &'a Switchboard,
}

impl CallPlan {
    pub fn method(&self) -> &str {
        &self.method
    }

    /// One entry per declared parameter, receiver excluded.
    pub fn slots(&self) -> &[Injection] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether the plan needs any event value.
    pub fn wants_event(&self) -> bool {
        self.slots.iter().any(|s| matches!(s, Injection::Event(_)))
    }

    /// Verify every event value the plan needs is in `shape`.
    pub fn check_shape(&self, shape: &[ParamKind]) -> Result<(), UnsupportedHandlerParameter> {
        for (slot, param) in self.slots.iter().zip(&self.params) {
            if let Injection::Event(kind) = slot {
                if !shape.contains(kind) {
                    return Err(UnsupportedHandlerParameter {
                        method: self.method.clone(),
                        param: param.clone(),
                        reason: Unsupported::NotDelivered,
                        available: shape.to_vec(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Build the positional arguments for one emission. `values` line up
    /// with `shape`, the shape of the signal that fired.
    pub fn arguments(
        &self,
        shape: &[ParamKind],
        values: &[EventValue],
        ctx: &CallContext<'_>,
    ) -> Result<Vec<Arg>, InvokeError> {
        self.slots
            .iter()
            .enumerate()
            .map(|(position, slot)| match slot {
                Injection::Event(kind) => shape
                    .iter()
                    .position(|k| k == kind)
                    .and_then(|i| values.get(i))
                    .map(|v| Arg::Value(v.clone()))
                    .ok_or_else(|| InvokeError::MissingArg {
                        method: self.method.clone(),
                        position,
                    }),
                Injection::Widget => Ok(Arg::Widget(ctx.widget)),
                Injection::Ui => Ok(Arg::Ui(Rc::clone(ctx.ui))),
                Injection::Switchboard => Ok(Arg::Switchboard(ctx.switchboard.clone())),
            })
            .collect()
    }
}

/// Match `method`'s declared parameters against the vocabulary and the
/// values `available` from its signal.
pub fn compute_injection(
    method: &Method,
    available: &[ParamKind],
) -> Result<CallPlan, UnsupportedHandlerParameter> {
    let mut params = Vec::new();
    let mut slots = Vec::new();
    for param in method.params() {
        if param == RECEIVER {
            continue;
        }
        let slot = Injection::from_param(param).ok_or_else(|| UnsupportedHandlerParameter {
            method: method.name().to_owned(),
            param: param.clone(),
            reason: Unsupported::UnknownName,
            available: available.to_vec(),
        })?;
        params.push(param.clone());
        slots.push(slot);
    }
    let plan = CallPlan {
        method: method.name().to_owned(),
        params,
        slots,
    };
    plan.check_shape(available)?;
    Ok(plan)
}

// ---------------------------------------------------------------------------
// PlanCache
// ---------------------------------------------------------------------------

/// Call plans of one UI instance, keyed by method name.
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: HashMap<String, Rc<CallPlan>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached plan for `method`, computed on first use. A cached plan
    /// is re-checked against `available`, so a second signal with a
    /// narrower shape is still rejected.
    pub fn plan_for(
        &mut self,
        method: &Method,
        available: &[ParamKind],
    ) -> Result<Rc<CallPlan>, UnsupportedHandlerParameter> {
        if let Some(plan) = self.plans.get(method.name()) {
            plan.check_shape(available)?;
            return Ok(Rc::clone(plan));
        }
        let plan = Rc::new(compute_injection(method, available)?);
        self.plans.insert(method.name().to_owned(), Rc::clone(&plan));
        Ok(plan)
    }

    pub fn get(&self, method: &str) -> Option<&Rc<CallPlan>> {
        self.plans.get(method)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn clear(&mut self) {
        self.plans.clear();
    }
}

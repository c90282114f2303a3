//! # switchboard
//!
//! Convention-based binding of declarative UI trees to handler classes.
//!
//! A UI is loaded by name from a declarative source. Every named widget in it
//! is matched to a handler method of the same name, the widget's signal is
//! chosen from its type, and the method is connected with exactly the
//! arguments it asks for. No wiring code is written by hand.
//!
//! ## Core Systems
//!
//! - **[`naming`]**: Identifier grammar: hierarchy paths, tags, name patterns
//! - **[`signal`]**: Event values and the widget type to signal policy table
//! - **[`handler`]**: Handler classes, parameter inspection, call plans, histories
//! - **[`registry`]**: Slotmap-backed widget registry of one UI instance
//! - **[`binding`]**: The bind pass: resolve, inspect, connect, initialize
//! - **[`menu`]**: Trigger resolution and input monitor lifecycle for menus
//! - **[`toolkit`]**: Collaborator traits a widget toolkit implements
//! - **[`switchboard`]**: Top-level orchestrator with lazy UI loading and caching
//! - **[`testing`]**: Fake toolkit, Pilot, log capture
//!
//! ## Example
//!
//! ```ignore
//! use switchboard::handler::HandlerClass;
//! use switchboard::Switchboard;
//!
//! let slots = HandlerClass::builder("MainSlots", |_| Saved::default())
//!     .method("save_btn", &["state"], |this: &mut Saved, inv| {
//!         this.states.push(inv.extract(0)?);
//!         Ok(())
//!     })
//!     .build();
//! let sb = Switchboard::builder().toolkit(toolkit).register(slots).build()?;
//! let main = sb.get_ui("main")?;
//! ```

// Foundation
pub mod config;
pub mod error;
pub mod input;
pub mod naming;
pub mod settings;
pub mod toolkit;

// Signals and handlers
pub mod handler;
pub mod signal;

// Binding
pub mod binding;
pub mod registry;

// Menus
pub mod menu;

// Orchestration
pub mod cache;
pub mod switchboard;
pub mod ui;

// Testing support
pub mod testing;

pub use binding::{BindError, BindReport};
pub use config::SwitchboardConfig;
pub use error::{Error, Result};
pub use handler::{HandlerClass, Handlers, Invocation, InvokeError};
pub use naming::{resolve, Identifier};
pub use signal::{EventValue, ParamKind, SignalPolicy};
pub use switchboard::{Relation, Switchboard, SwitchboardBuilder, WeakSwitchboard};
pub use toolkit::{InputMonitor, LoadedTree, SignalConnector, UiLoader, WidgetHandle};
pub use ui::Ui;

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use switchboard_macros::handlers;

//! Headless testing support: fake toolkit, Pilot, log capture.
//!
//! Use the [`FakeToolkit`] as loader, connector and input monitor of a
//! [`Switchboard`](crate::Switchboard) without a real widget toolkit. Use the
//! [`Pilot`] to drive bound UIs by widget name, and [`capture_logs`] to
//! assert on what the engine logged.

pub mod fake;
pub mod log_capture;
pub mod pilot;

use std::rc::Rc;

pub use fake::FakeToolkit;
pub use log_capture::{capture_logs, CapturedLogs, CapturedRecord};
pub use pilot::Pilot;

use crate::switchboard::Switchboard;

/// A switchboard over an empty [`FakeToolkit`] with no handler classes.
pub fn bare_switchboard() -> Switchboard {
    let toolkit = Rc::new(FakeToolkit::new());
    match Switchboard::builder().toolkit(toolkit).build() {
        Ok(sb) => sb,
        Err(err) => unreachable!("every collaborator is provided: {err}"),
    }
}

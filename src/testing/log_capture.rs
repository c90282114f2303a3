//! Capture `log` records emitted while a closure runs.
//!
//! A process-wide logger is installed on first use; records are collected
//! only on threads currently inside [`capture_logs`], so parallel tests do
//! not see each other's output. If another logger was installed first,
//! nothing is captured.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// One captured log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Records captured by [`capture_logs`], in emission order.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    records: Vec<CapturedRecord>,
}

impl CapturedLogs {
    pub fn records(&self) -> &[CapturedRecord] {
        &self.records
    }

    pub fn at(&self, level: Level) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.as_str())
            .collect()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.at(Level::Warn)
    }

    pub fn errors(&self) -> Vec<&str> {
        self.at(Level::Error)
    }

    /// Whether any warning contains `needle`.
    pub fn contains_warning(&self, needle: &str) -> bool {
        self.warnings().iter().any(|m| m.contains(needle))
    }

    /// Whether any error contains `needle`.
    pub fn contains_error(&self, needle: &str) -> bool {
        self.errors().iter().any(|m| m.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

thread_local! {
    static BUFFER: RefCell<Option<Vec<CapturedRecord>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        BUFFER.with(|b| b.borrow().is_some())
    }

    fn log(&self, record: &Record<'_>) {
        BUFFER.with(|b| {
            if let Some(records) = b.borrow_mut().as_mut() {
                records.push(CapturedRecord {
                    level: record.level(),
                    target: record.target().to_owned(),
                    message: record.args().to_string(),
                });
            }
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Run `f`, returning its result and every record it logged on this thread.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, CapturedLogs) {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    let outer = BUFFER.with(|b| b.borrow_mut().replace(Vec::new()));
    let result = f();
    let records = BUFFER.with(|b| {
        let mut slot = b.borrow_mut();
        let records = slot.take().unwrap_or_default();
        *slot = outer;
        records
    });
    (result, CapturedLogs { records })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_by_level() {
        let (value, logs) = capture_logs(|| {
            log::warn!("careful: {}", 1);
            log::error!("broken");
            log::debug!("noise");
            7
        });
        assert_eq!(value, 7);
        assert_eq!(logs.warnings(), vec!["careful: 1"]);
        assert!(logs.contains_error("broken"));
        assert!(!logs.contains_warning("broken"));
        assert_eq!(logs.records().len(), 3);
    }

    #[test]
    fn nothing_outside_capture() {
        log::warn!("uncaptured");
        let ((), logs) = capture_logs(|| {});
        assert!(logs.is_empty());
    }
}

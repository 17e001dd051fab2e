//! Observability for tagstore
//!
//! Store operations report lifecycle events as structured JSON lines on
//! stderr. Logging never changes the outcome of an operation: failed
//! writes to stderr are dropped.
//!
//! ```ignore
//! use tagstore::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RewriteComplete, &[("path", "people.db"), ("matched", "1")]);
//! ```
//!
//! The threshold comes from `TAGSTORE_LOG` (`trace`, `info`, `warn`,
//! `error`, `fatal`, `off`; default `warn`) unless [`Logger::init`] ran first.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity, LOG_ENV};

/// Logs an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_line_uses_event_severity() {
        let line = logger::format_line(
            Event::RewriteAborted.severity(),
            Event::RewriteAborted.as_str(),
            &[("path", "/tmp/x.db")],
        );
        assert!(line.starts_with("{\"event\":\"REWRITE_ABORTED\",\"severity\":\"ERROR\""));
    }

    #[test]
    fn test_log_event_does_not_panic() {
        log_event_with_fields(Event::StoreOpened, &[]);
        log_event_with_fields(Event::RewriteSkipped, &[("path", "/tmp/x.db")]);
    }
}

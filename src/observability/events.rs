//! Observable events for tagstore
//!
//! Events are explicit and typed; each carries its default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in tagstore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// CLI configuration file loaded
    ConfigLoaded,
    /// Store configured against a schema
    StoreOpened,

    // Append
    /// One record appended
    RecordAppended,
    /// Batch appended in full
    BatchAppended,
    /// Batch stopped early; earlier lines remain
    BatchAppendPartial,

    // Reads
    /// Full or keyed scan finished
    ScanComplete,
    /// A line could not be decoded
    DecodeFailed,

    // Rewrite protocol
    /// Rewrite pass begins
    RewriteStart,
    /// Temporary file swapped in
    RewriteComplete,
    /// No line matched; original left in place
    RewriteSkipped,
    /// Rewrite failed; original left in place
    RewriteAborted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",

            Event::RecordAppended => "RECORD_APPENDED",
            Event::BatchAppended => "BATCH_APPENDED",
            Event::BatchAppendPartial => "BATCH_APPEND_PARTIAL",

            Event::ScanComplete => "SCAN_COMPLETE",
            Event::DecodeFailed => "DECODE_FAILED",

            Event::RewriteStart => "REWRITE_START",
            Event::RewriteComplete => "REWRITE_COMPLETE",
            Event::RewriteSkipped => "REWRITE_SKIPPED",
            Event::RewriteAborted => "REWRITE_ABORTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RecordAppended
            | Event::ScanComplete
            | Event::RewriteStart
            | Event::RewriteSkipped => Severity::Trace,
            Event::ConfigLoaded
            | Event::StoreOpened
            | Event::BatchAppended
            | Event::RewriteComplete => Severity::Info,
            Event::BatchAppendPartial | Event::DecodeFailed => Severity::Warn,
            Event::RewriteAborted => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Event; 11] = [
        Event::ConfigLoaded,
        Event::StoreOpened,
        Event::RecordAppended,
        Event::BatchAppended,
        Event::BatchAppendPartial,
        Event::ScanComplete,
        Event::DecodeFailed,
        Event::RewriteStart,
        Event::RewriteComplete,
        Event::RewriteSkipped,
        Event::RewriteAborted,
    ];

    #[test]
    fn test_all_events_have_string_representation() {
        for event in ALL {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_names_unique() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn test_failures_are_loud() {
        assert!(Event::RewriteAborted.severity() >= Severity::Error);
        assert!(Event::DecodeFailed.severity() >= Severity::Warn);
        assert!(Event::RecordAppended.severity() < Severity::Info);
    }
}

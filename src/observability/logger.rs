//! Structured JSON logger for tagstore
//!
//! One line per event: `event`, then `severity`, then the fields sorted by
//! name. Written synchronously to stderr; stdout carries CLI responses.

use std::fmt;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Environment variable holding the log threshold
pub const LOG_ENV: &str = "TAGSTORE_LOG";

/// Log severity levels, least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Parses a threshold name. `Ok(None)` means logging is off.
    pub fn parse_threshold(s: &str) -> Result<Option<Severity>, String> {
        let level = s.trim().to_ascii_lowercase();
        if level == "off" {
            return Ok(None);
        }
        [
            Severity::Trace,
            Severity::Info,
            Severity::Warn,
            Severity::Error,
            Severity::Fatal,
        ]
        .into_iter()
        .find(|sev| sev.as_str().eq_ignore_ascii_case(&level))
        .map(Some)
        .ok_or_else(|| format!("Unknown log level: '{}'", s.trim()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static THRESHOLD: OnceLock<Option<Severity>> = OnceLock::new();

/// Process-wide structured logger
pub struct Logger;

impl Logger {
    /// Fixes the threshold for the rest of the process.
    ///
    /// Returns false if it was already fixed, by an earlier call or by the
    /// first log line reading `TAGSTORE_LOG`.
    pub fn init(threshold: Option<Severity>) -> bool {
        THRESHOLD.set(threshold).is_ok()
    }

    /// Current threshold; `None` means logging is off. WARN unless
    /// `TAGSTORE_LOG` names another level.
    pub fn threshold() -> Option<Severity> {
        *THRESHOLD.get_or_init(|| {
            std::env::var(LOG_ENV)
                .ok()
                .and_then(|v| Severity::parse_threshold(&v).ok())
                .unwrap_or(Some(Severity::Warn))
        })
    }

    /// Returns true if lines at `severity` are written
    pub fn enabled(severity: Severity) -> bool {
        Self::threshold().map_or(false, |t| severity >= t)
    }

    /// Writes one event line if `severity` passes the threshold.
    /// Write failures are ignored.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        let line = format_line(severity, event, fields);
        let mut stderr = io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Renders one newline-terminated JSON log line.
pub(crate) fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);

    let mut line = format!(
        "{{\"event\":{},\"severity\":\"{}\"",
        json_string(event),
        severity
    );
    for (name, value) in sorted {
        line.push(',');
        line.push_str(&json_string(name));
        line.push(':');
        line.push_str(&json_string(value));
    }
    line.push_str("}\n");
    line
}

fn json_string(s: &str) -> String {
    // Serializing a str cannot fail.
    serde_json::to_string(s).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(Severity::parse_threshold("trace"), Ok(Some(Severity::Trace)));
        assert_eq!(Severity::parse_threshold(" WARN "), Ok(Some(Severity::Warn)));
        assert_eq!(Severity::parse_threshold("Fatal"), Ok(Some(Severity::Fatal)));
        assert_eq!(Severity::parse_threshold("off"), Ok(None));
        assert!(Severity::parse_threshold("loud").is_err());
    }

    #[test]
    fn test_line_shape() {
        let line = format_line(
            Severity::Warn,
            "DECODE_FAILED",
            &[("path", "/tmp/people.db"), ("line", "3")],
        );
        assert_eq!(
            line,
            "{\"event\":\"DECODE_FAILED\",\"severity\":\"WARN\",\"line\":\"3\",\"path\":\"/tmp/people.db\"}\n"
        );
    }

    #[test]
    fn test_field_order_is_independent_of_input_order() {
        let a = format_line(Severity::Info, "E", &[("zebra", "1"), ("apple", "2")]);
        let b = format_line(Severity::Info, "E", &[("apple", "2"), ("zebra", "1")]);
        assert_eq!(a, b);
        assert!(a.find("apple").unwrap() < a.find("zebra").unwrap());
    }

    #[test]
    fn test_values_are_escaped() {
        let raw = "<db.Name>a\nb</db.Name> \"q\"\u{1}";
        let line = format_line(Severity::Info, "E", &[("key", raw)]);

        assert_eq!(line.matches('\n').count(), 1);
        assert_eq!(parse(&line)["key"], raw);
        assert_eq!(parse(&line)["severity"], "INFO");
    }
}

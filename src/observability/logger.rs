//! Structured JSON logger
//!
//! - One log line = one event
//! - Deterministic key ordering
//! - Explicit severity levels
//! - Synchronous, no buffering
//! - Always stderr
//!
//! The logger is a plain `Copy` value carrying its minimum severity. Parser
//! and executor each own one, so nothing here is process-wide.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Per-stage detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Absorbed input problems
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Nothing is logged at or above this level
    Off = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Off => "OFF",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "off" | "none" => Ok(Severity::Off),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// A structured logger that writes one JSON object per line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logger {
    min_severity: Severity,
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Logger {
    /// Creates a logger that emits events at or above `min_severity`
    pub fn new(min_severity: Severity) -> Self {
        Self { min_severity }
    }

    /// A logger that never writes anything
    pub fn disabled() -> Self {
        Self::new(Severity::Off)
    }

    /// Returns true if an event at `severity` would be written
    pub fn enabled(&self, severity: Severity) -> bool {
        severity != Severity::Off && severity >= self.min_severity
    }

    /// Log an event to stderr. Stdout is left to the caller's output.
    pub fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if self.enabled(severity) {
            Self::write_line(severity, event, fields, &mut io::stderr());
        }
    }

    /// Renders one log line. `event` and `severity` come first, then the
    /// remaining fields sorted by key.
    pub(crate) fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let sorted: BTreeMap<&str, &str> = fields.iter().copied().collect();

        let mut output = String::with_capacity(128);
        output.push_str("{\"event\":");
        output.push_str(&json_string(event));
        output.push_str(",\"severity\":");
        output.push_str(&json_string(severity.as_str()));
        for (key, value) in sorted {
            output.push(',');
            output.push_str(&json_string(key));
            output.push(':');
            output.push_str(&json_string(value));
        }
        output.push('}');
        output
    }

    fn write_line<W: Write>(severity: Severity, event: &str, fields: &[(&str, &str)], writer: &mut W) {
        let mut line = Self::render(severity, event, fields);
        line.push('\n');
        // Logging must never fail the caller
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

fn json_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Off);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("TRACE".parse::<Severity>().unwrap(), Severity::Trace);
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("off".parse::<Severity>().unwrap(), Severity::Off);
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn test_enabled_threshold() {
        let logger = Logger::new(Severity::Warn);
        assert!(!logger.enabled(Severity::Trace));
        assert!(!logger.enabled(Severity::Info));
        assert!(logger.enabled(Severity::Warn));
        assert!(logger.enabled(Severity::Error));

        let off = Logger::disabled();
        assert!(!off.enabled(Severity::Error));
    }

    #[test]
    fn test_default_logger_is_silent() {
        let logger = Logger::default();
        assert_eq!(logger, Logger::disabled());
        assert!(!logger.enabled(Severity::Error));
    }

    #[test]
    fn test_write_line_appends_newline() {
        let mut out = Vec::new();
        Logger::write_line(Severity::Info, "CONFIG_LOADED", &[("path", "a.json")], &mut out);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "{\"event\":\"CONFIG_LOADED\",\"severity\":\"INFO\",\"path\":\"a.json\"}\n"
        );
    }

    #[test]
    fn test_render_is_valid_json() {
        let line = Logger::render(Severity::Info, "QUERY_PARSED", &[]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "QUERY_PARSED");
        assert_eq!(parsed["severity"], "INFO");
    }

    #[test]
    fn test_render_sorts_fields() {
        let line = Logger::render(
            Severity::Trace,
            "STAGE_APPLIED",
            &[("stage", "filter"), ("remaining", "3")],
        );
        let remaining = line.find("\"remaining\"").unwrap();
        let stage = line.find("\"stage\"").unwrap();
        assert!(remaining < stage);
    }

    #[test]
    fn test_render_escapes_strings() {
        let line = Logger::render(
            Severity::Warn,
            "FILTER_SEGMENT_DROPPED",
            &[("segment", "name eq \"x\"\n")],
        );
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["segment"], "name eq \"x\"\n");
    }
}

//! Structured JSON logger
//!
//! One log line = one event, written synchronously with deterministic
//! field ordering (event and severity first, then fields sorted by key),
//! so log output is byte-stable for identical event streams and safe to
//! assert on in tests.

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations (query accepted, query completed)
    Info = 0,
    /// Recoverable oddities (sink closed mid-scan)
    Warn = 1,
    /// Failed operations (query rejected at construction)
    Error = 2,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synchronous structured logger; INFO/WARN to stdout, ERROR to stderr.
pub struct Logger;

impl Logger {
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::write_event(Severity::Info, event, fields, &mut io::stdout());
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::write_event(Severity::Warn, event, fields, &mut io::stdout());
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::write_event(Severity::Error, event, fields, &mut io::stderr());
    }

    fn write_event<W: Write>(severity: Severity, event: &str, fields: &[(&str, &str)], out: &mut W) {
        let mut line = String::with_capacity(128);
        line.push_str("{\"event\":\"");
        escape_into(&mut line, event);
        line.push_str("\",\"severity\":\"");
        line.push_str(severity.as_str());
        line.push('"');

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);
        for (key, value) in sorted {
            line.push_str(",\"");
            escape_into(&mut line, key);
            line.push_str("\":\"");
            escape_into(&mut line, value);
            line.push('"');
        }
        line.push_str("}\n");

        // One write, one flush: a line is never interleaved or buffered
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut buf = Vec::new();
        Logger::write_event(severity, event, fields, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_event_is_valid_single_line_json() {
        let line = capture(
            Severity::Info,
            "QUERY_COMPLETED",
            &[("table", "hostsbygroup"), ("rows_emitted", "3")],
        );
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "QUERY_COMPLETED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["table"], "hostsbygroup");
        assert_eq!(parsed["rows_emitted"], "3");
    }

    #[test]
    fn test_field_order_is_deterministic() {
        let a = capture(Severity::Info, "E", &[("b", "2"), ("a", "1")]);
        let b = capture(Severity::Info, "E", &[("a", "1"), ("b", "2")]);
        assert_eq!(a, b);
        assert!(a.find("\"a\"").unwrap() < a.find("\"b\"").unwrap());
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let line = capture(Severity::Error, "QUERY_REJECTED", &[("reason", "bad \"col\"\n")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["reason"], "bad \"col\"\n");
    }
}

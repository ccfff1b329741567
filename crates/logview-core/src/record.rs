//! A single log line as shown in the viewer.

use chrono::{DateTime, Local};

use crate::palette::{LogColor, Severity, SeverityPalette};

/// One log line. Producers build it, the viewer resolves its color, and the stream owns it
/// from then on. Records carry no identity beyond their position in the stream.
///
/// There is no per-record change notification: a record is immutable once queued.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// When the line was produced.
    pub timestamp: DateTime<Local>,

    /// Message text, displayed verbatim.
    pub message: String,

    color: LogColor,
    severity: Severity,
}

impl LogRecord {
    /// Record stamped with the current local time.
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(Local::now(), message)
    }

    /// Record with an explicit timestamp.
    pub fn at(timestamp: DateTime<Local>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
            color: SeverityPalette::color(Severity::Info),
            severity: Severity::Info,
        }
    }

    /// Record stamped now with its severity already resolved.
    pub(crate) fn resolved(message: impl Into<String>, severity: Severity) -> Self {
        let mut record = Self::new(message);
        record.resolve(severity);
        record
    }

    pub fn color(&self) -> LogColor {
        self.color
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Resolve the display color for `severity`. Only the viewer calls this, right before the
    /// record is handed to the stream.
    pub(crate) fn resolve(&mut self, severity: Severity) {
        self.severity = severity;
        self.color = SeverityPalette::color(severity);
    }

    /// Timestamp rendered with a chrono format string, e.g. `%H:%M:%S`.
    pub fn formatted_timestamp(&self, format: &str) -> String {
        self.timestamp.format(format).to_string()
    }
}

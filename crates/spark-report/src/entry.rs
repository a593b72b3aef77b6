//! Report entries and the log lines they accumulate.

use std::fmt;

use crate::Severity;

/// Handle addressing one entry inside a [`ReportSession`](crate::ReportSession).
///
/// Handles are only meaningful for the session that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl EntryId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Zero-based position of the entry in creation order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One severity-tagged message attached to a report entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    severity: Severity,
    message: String,
}

impl LogLine {
    /// Create a log line.
    ///
    /// # Examples
    /// ```
    /// use spark_report::{LogLine, Severity};
    ///
    /// let line = LogLine::new(Severity::Info, "GET /posts/1");
    /// assert_eq!(line.severity(), Severity::Info);
    /// assert_eq!(line.message(), "GET /posts/1");
    /// ```
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Severity of the line.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Text of the line.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Report node describing a single scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportEntry {
    name: String,
    logs: Vec<LogLine>,
}

impl ReportEntry {
    /// Create an empty entry with the given display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logs: Vec::new(),
        }
    }

    /// Display name of the entry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Log lines in the order they were appended.
    #[must_use]
    pub fn logs(&self) -> &[LogLine] {
        &self.logs
    }

    /// Aggregate status of the entry.
    ///
    /// The most severe logged severity wins. Entries holding only
    /// informational lines, or no lines at all, count as passed.
    ///
    /// # Examples
    /// ```
    /// use spark_report::{LogLine, ReportEntry, Severity};
    ///
    /// let mut entry = ReportEntry::new("scenario");
    /// assert_eq!(entry.status(), Severity::Pass);
    /// entry.push(LogLine::new(Severity::Skip, "step skip"));
    /// entry.push(LogLine::new(Severity::Pass, "Scenario pass"));
    /// assert_eq!(entry.status(), Severity::Skip);
    /// ```
    #[must_use]
    pub fn status(&self) -> Severity {
        self.logs
            .iter()
            .map(LogLine::severity)
            .fold(Severity::Pass, Severity::most_severe)
    }

    /// Messages of every line logged with the given severity.
    pub fn messages_with(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.logs
            .iter()
            .filter(move |line| line.severity() == severity)
            .map(LogLine::message)
    }

    /// Append a line to the entry.
    pub fn push(&mut self, line: LogLine) {
        self.logs.push(line);
    }
}

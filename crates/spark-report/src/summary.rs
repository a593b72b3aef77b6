//! Aggregate counts over a set of report entries.

use crate::{ReportEntry, Severity};

/// Number of entries per aggregate status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Total number of entries.
    pub total: usize,
    /// Entries whose status is [`Severity::Pass`].
    pub passed: usize,
    /// Entries whose status is [`Severity::Fail`].
    pub failed: usize,
    /// Entries whose status is [`Severity::Skip`].
    pub skipped: usize,
}

impl ReportSummary {
    /// Count the statuses of the provided entries.
    ///
    /// # Examples
    /// ```
    /// use spark_report::{LogLine, ReportEntry, ReportSummary, Severity};
    ///
    /// let mut failed = ReportEntry::new("failed");
    /// failed.push(LogLine::new(Severity::Fail, "boom"));
    /// let summary = ReportSummary::of(&[ReportEntry::new("passed"), failed]);
    /// assert_eq!(summary.total, 2);
    /// assert_eq!(summary.passed, 1);
    /// assert_eq!(summary.failed, 1);
    /// ```
    #[must_use]
    pub fn of(entries: &[ReportEntry]) -> Self {
        entries
            .iter()
            .fold(Self::default(), |mut summary, entry| {
                summary.total += 1;
                match entry.status() {
                    Severity::Fail => summary.failed += 1,
                    Severity::Skip => summary.skipped += 1,
                    Severity::Pass | Severity::Info => summary.passed += 1,
                }
                summary
            })
    }
}

//! Runner statuses and their report severities.

use std::fmt;

use spark_report::Severity;

/// Final status a runner reports for a step or scenario.
///
/// Runners with richer status sets (pending, undefined, ambiguous, ...)
/// report everything they cannot express otherwise as [`Unknown`](Self::Unknown).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunnerStatus {
    /// Completed successfully.
    Passed,
    /// Completed with an assertion failure or error.
    Failed,
    /// Not executed.
    Skipped,
    /// Any status the runner cannot classify as one of the above.
    Unknown,
}

impl RunnerStatus {
    /// Classify a runner status label.
    ///
    /// Matching ignores case and surrounding whitespace; unrecognized labels
    /// become [`RunnerStatus::Unknown`].
    ///
    /// # Examples
    /// ```
    /// use spark_bridge::RunnerStatus;
    ///
    /// assert_eq!(RunnerStatus::from_label("FAILED"), RunnerStatus::Failed);
    /// assert_eq!(RunnerStatus::from_label("pending"), RunnerStatus::Unknown);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "skipped" => Self::Skipped,
            _ => Self::Unknown,
        }
    }

    /// Uppercase label of the status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Report severity recorded for this status.
    ///
    /// `Unknown` is recorded as a pass. The arm is explicit and logged so new
    /// runner statuses surface in the logs instead of passing silently.
    ///
    /// # Examples
    /// ```
    /// use spark_bridge::RunnerStatus;
    /// use spark_report::Severity;
    ///
    /// assert_eq!(RunnerStatus::Failed.severity(), Severity::Fail);
    /// assert_eq!(RunnerStatus::Skipped.severity(), Severity::Skip);
    /// assert_eq!(RunnerStatus::Unknown.severity(), Severity::Pass);
    /// ```
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::Failed => Severity::Fail,
            Self::Skipped => Severity::Skip,
            Self::Passed => Severity::Pass,
            Self::Unknown => {
                log::warn!("runner reported an unknown status; recording it as a pass");
                Severity::Pass
            }
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Passed => 0,
            Self::Skipped => 1,
            Self::Unknown => 2,
            Self::Failed => 3,
        }
    }

    /// Combine two statuses, keeping the worse one.
    ///
    /// Failed outranks unknown, unknown outranks skipped and skipped outranks
    /// passed.
    #[must_use]
    pub const fn worst(self, other: Self) -> Self {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for RunnerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

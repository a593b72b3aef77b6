//! Severity levels attached to report log lines.

use std::fmt;

/// Severity of a single report log line.
///
/// The set is closed: informational lines, passes, failures and skips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational line such as the text of a step about to run.
    Info,
    /// Something completed successfully.
    Pass,
    /// Something failed.
    Fail,
    /// Something was skipped.
    Skip,
}

impl Severity {
    /// Lowercase label used inside log messages and serialized reports.
    ///
    /// # Examples
    /// ```
    /// use spark_report::Severity;
    ///
    /// assert_eq!(Severity::Fail.label(), "fail");
    /// ```
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Info => 0,
            Self::Pass => 1,
            Self::Skip => 2,
            Self::Fail => 3,
        }
    }

    /// Return whichever of the two severities dominates an entry's status.
    ///
    /// Failures outrank skips, skips outrank passes and passes outrank
    /// informational lines.
    ///
    /// # Examples
    /// ```
    /// use spark_report::Severity;
    ///
    /// assert_eq!(Severity::Pass.most_severe(Severity::Skip), Severity::Skip);
    /// assert_eq!(Severity::Fail.most_severe(Severity::Skip), Severity::Fail);
    /// ```
    #[must_use]
    pub const fn most_severe(self, other: Self) -> Self {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "INFO",
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::Severity;
    use rstest::rstest;

    #[rstest]
    #[case::info(Severity::Info, "info", "INFO")]
    #[case::pass(Severity::Pass, "pass", "PASS")]
    #[case::fail(Severity::Fail, "fail", "FAIL")]
    #[case::skip(Severity::Skip, "skip", "SKIP")]
    fn labels_and_display(#[case] severity: Severity, #[case] label: &str, #[case] shown: &str) {
        assert_eq!(severity.label(), label);
        assert_eq!(severity.to_string(), shown);
    }

    #[rstest]
    #[case(Severity::Info, Severity::Pass, Severity::Pass)]
    #[case(Severity::Pass, Severity::Info, Severity::Pass)]
    #[case(Severity::Skip, Severity::Pass, Severity::Skip)]
    #[case(Severity::Skip, Severity::Fail, Severity::Fail)]
    #[case(Severity::Fail, Severity::Info, Severity::Fail)]
    fn most_severe_prefers_failures(
        #[case] left: Severity,
        #[case] right: Severity,
        #[case] expected: Severity,
    ) {
        assert_eq!(left.most_severe(right), expected);
    }
}

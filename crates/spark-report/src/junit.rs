//! `JUnit` XML writer for report entries.
//!
//! The writer produces a single `<testsuite>` document that CI systems can
//! ingest next to the HTML page. Failed entries carry a `<failure>` child
//! whose message is the first failure line; skipped entries carry
//! `<skipped />`. Every log line is kept in `<system-out>`.

use std::fmt::{self, Write};

use crate::escape::write_escaped;
use crate::{ReportEntry, ReportSummary, Severity};

/// Render `entries` as a `JUnit` XML document named `suite_name`.
///
/// # Examples
/// ```
/// use spark_report::{junit, ReportEntry};
///
/// let mut output = String::new();
/// junit::write(&mut output, "Spark", &[ReportEntry::new("scenario")]).unwrap();
/// assert!(output.contains("<testsuite name=\"Spark\" tests=\"1\""));
/// ```
///
/// # Errors
/// Returns an error if writing to the provided formatter fails.
pub fn write<W: Write>(writer: &mut W, suite_name: &str, entries: &[ReportEntry]) -> fmt::Result {
    let summary = ReportSummary::of(entries);
    writer.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
    writer.write_str("<testsuite name=\"")?;
    write_escaped(writer, suite_name)?;
    writeln!(
        writer,
        "\" tests=\"{}\" failures=\"{}\" skipped=\"{}\">",
        summary.total, summary.failed, summary.skipped,
    )?;
    for entry in entries {
        write_testcase(writer, suite_name, entry)?;
    }
    writer.write_str("</testsuite>\n")
}

fn write_testcase<W: Write>(writer: &mut W, suite_name: &str, entry: &ReportEntry) -> fmt::Result {
    writer.write_str("  <testcase name=\"")?;
    write_escaped(writer, entry.name())?;
    writer.write_str("\" classname=\"")?;
    write_escaped(writer, suite_name)?;
    writer.write_char('"')?;
    if entry.logs().is_empty() {
        return writer.write_str(" />\n");
    }
    writer.write_str(">\n")?;
    match entry.status() {
        Severity::Fail => {
            writer.write_str("    <failure")?;
            if let Some(message) = entry.messages_with(Severity::Fail).next() {
                writer.write_str(" message=\"")?;
                write_escaped(writer, message)?;
                writer.write_char('"')?;
            }
            writer.write_str(" />\n")?;
        }
        Severity::Skip => writer.write_str("    <skipped />\n")?,
        Severity::Pass | Severity::Info => {}
    }
    writer.write_str("    <system-out>")?;
    for line in entry.logs() {
        write!(writer, "{} ", line.severity())?;
        write_escaped(writer, line.message())?;
        writer.write_char('\n')?;
    }
    writer.write_str("</system-out>\n  </testcase>\n")
}

/// Render `entries` as a `JUnit` XML string.
///
/// # Errors
/// Returns an error if rendering fails.
pub fn to_string(suite_name: &str, entries: &[ReportEntry]) -> Result<String, fmt::Error> {
    let mut output = String::new();
    write(&mut output, suite_name, entries)?;
    Ok(output)
}

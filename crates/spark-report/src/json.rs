//! JSON writer for report entries.
//!
//! The schema keeps status and severity labels in lowercase so downstream
//! tools can rely on consistent casing.

use std::io::Write;

use serde::Serialize;

use crate::{LogLine, ReportEntry, ReportSummary};

#[derive(Serialize)]
struct JsonReport<'a> {
    name: &'a str,
    summary: JsonSummary,
    entries: Vec<JsonEntry<'a>>,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    name: &'a str,
    status: &'static str,
    logs: Vec<JsonLog<'a>>,
}

#[derive(Serialize)]
struct JsonLog<'a> {
    severity: &'static str,
    message: &'a str,
}

impl<'a> JsonReport<'a> {
    fn new(name: &'a str, entries: &'a [ReportEntry]) -> Self {
        let ReportSummary {
            total,
            passed,
            failed,
            skipped,
        } = ReportSummary::of(entries);
        Self {
            name,
            summary: JsonSummary {
                total,
                passed,
                failed,
                skipped,
            },
            entries: entries.iter().map(JsonEntry::from).collect(),
        }
    }
}

impl<'a> From<&'a ReportEntry> for JsonEntry<'a> {
    fn from(entry: &'a ReportEntry) -> Self {
        Self {
            name: entry.name(),
            status: entry.status().label(),
            logs: entry.logs().iter().map(JsonLog::from).collect(),
        }
    }
}

impl<'a> From<&'a LogLine> for JsonLog<'a> {
    fn from(line: &'a LogLine) -> Self {
        Self {
            severity: line.severity().label(),
            message: line.message(),
        }
    }
}

/// Serialize `entries` into the supplied writer.
///
/// # Examples
/// ```rust
/// use spark_report::{json, ReportEntry};
///
/// let mut buffer = Vec::new();
/// json::write(&mut buffer, "Spark", &[ReportEntry::new("scenario")]).unwrap();
/// let output = String::from_utf8(buffer).unwrap();
/// assert!(output.contains("\"status\":\"pass\""));
/// ```
///
/// # Errors
/// Returns an error when serialization fails.
pub fn write<W: Write>(
    writer: &mut W,
    report_name: &str,
    entries: &[ReportEntry],
) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &JsonReport::new(report_name, entries))
}

/// Produce a JSON string representation of `entries`.
///
/// # Errors
/// Returns an error when serialization fails.
pub fn to_string(report_name: &str, entries: &[ReportEntry]) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport::new(report_name, entries))
}

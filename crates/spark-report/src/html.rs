//! Self-contained HTML page for a report session.
//!
//! The page carries its own stylesheet so it can be opened straight from the
//! build directory. A summary header counts entries per status and each entry
//! renders as a section listing its log lines in order.

use std::fmt::{self, Write};

use crate::escape::write_escaped;
use crate::{ReportEntry, ReportSummary, Severity};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f5f6fa;color:#222}\
header{background:#1f2a44;color:#fff;padding:1rem 2rem}\
header h1{margin:0 0 .5rem;font-size:1.4rem}\
.summary span{margin-right:1.5rem}\
main{padding:1rem 2rem}\
section.entry{background:#fff;border-left:6px solid #999;margin:0 0 1rem;padding:.5rem 1rem}\
section.pass{border-color:#2e9d4f}\
section.fail{border-color:#d64545}\
section.skip{border-color:#e0a020}\
table{border-collapse:collapse;width:100%}\
td{padding:.25rem .5rem;border-top:1px solid #eee;vertical-align:top}\
td.severity{width:4rem;font-weight:bold}\
.info{color:#3a6ea5}.pass{color:#2e9d4f}.fail{color:#d64545}.skip{color:#b07800}\
";

/// Render `entries` as a complete HTML document.
///
/// # Examples
/// ```
/// use spark_report::{html, LogLine, ReportEntry, Severity};
///
/// let mut entry = ReportEntry::new("Get post");
/// entry.push(LogLine::new(Severity::Info, "GET /posts/1"));
/// let mut page = String::new();
/// html::write(&mut page, "Spark", &[entry]).unwrap();
/// assert!(page.starts_with("<!DOCTYPE html>"));
/// assert!(page.contains("GET /posts/1"));
/// ```
///
/// # Errors
/// Returns an error if writing to the provided formatter fails.
pub fn write<W: Write>(writer: &mut W, title: &str, entries: &[ReportEntry]) -> fmt::Result {
    let summary = ReportSummary::of(entries);
    writer.write_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n")?;
    writer.write_str("<title>")?;
    write_escaped(writer, title)?;
    writer.write_str("</title>\n<style>")?;
    writer.write_str(STYLE)?;
    writer.write_str("</style>\n</head>\n<body>\n<header>\n<h1>")?;
    write_escaped(writer, title)?;
    writer.write_str("</h1>\n")?;
    writeln!(
        writer,
        "<div class=\"summary\"><span>Tests: {}</span><span class=\"pass\">Passed: {}</span>\
         <span class=\"fail\">Failed: {}</span><span class=\"skip\">Skipped: {}</span></div>",
        summary.total, summary.passed, summary.failed, summary.skipped,
    )?;
    writer.write_str("</header>\n<main>\n")?;
    for entry in entries {
        write_entry(writer, entry)?;
    }
    writer.write_str("</main>\n</body>\n</html>\n")
}

fn write_entry<W: Write>(writer: &mut W, entry: &ReportEntry) -> fmt::Result {
    let status = entry.status();
    writeln!(writer, "<section class=\"entry {}\">", status.label())?;
    writer.write_str("<h2>")?;
    write_escaped(writer, entry.name())?;
    writeln!(
        writer,
        " <small class=\"{}\">{status}</small></h2>",
        status.label()
    )?;
    writer.write_str("<table>\n")?;
    for line in entry.logs() {
        write_line(writer, line.severity(), line.message())?;
    }
    writer.write_str("</table>\n</section>\n")
}

fn write_line<W: Write>(writer: &mut W, severity: Severity, message: &str) -> fmt::Result {
    write!(
        writer,
        "<tr><td class=\"severity {}\">{severity}</td><td>",
        severity.label()
    )?;
    write_escaped(writer, message)?;
    writer.write_str("</td></tr>\n")
}

/// Render `entries` as an HTML string.
///
/// # Errors
/// Returns an error if rendering fails.
pub fn to_string(title: &str, entries: &[ReportEntry]) -> Result<String, fmt::Error> {
    let mut page = String::new();
    write(&mut page, title, entries)?;
    Ok(page)
}

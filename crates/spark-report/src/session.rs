//! The report session and the sink contract it fulfils.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::{EntryId, LogLine, ReportConfig, ReportEntry, ReportError, Severity, html, junit};

/// Destination for scenario entries and their log lines.
///
/// Implementors collect entries while a run progresses and serialize them on
/// [`flush`](ReportSink::flush).
pub trait ReportSink {
    /// Create a new entry and return its handle.
    fn create_entry(&mut self, name: &str) -> EntryId;

    /// Append a line to the entry identified by `entry`.
    ///
    /// # Errors
    /// Returns an error when `entry` was not created by this sink.
    fn log(&mut self, entry: EntryId, severity: Severity, message: &str)
    -> Result<(), ReportError>;

    /// Serialize everything collected so far to durable storage.
    ///
    /// # Errors
    /// Returns an error when rendering or writing a report fails.
    fn flush(&mut self) -> Result<(), ReportError>;
}

/// In-memory collection of report entries for one test run.
///
/// Flushing may be repeated; every flush rewrites the configured outputs
/// with the current entries.
#[derive(Debug, Default)]
pub struct ReportSession {
    config: ReportConfig,
    entries: Vec<ReportEntry>,
}

impl ReportSession {
    /// Create an empty session writing to the configured outputs.
    #[must_use]
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    /// Configuration used on flush.
    #[must_use]
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Entries in creation order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Look up an entry by handle.
    #[must_use]
    pub fn entry(&self, entry: EntryId) -> Option<&ReportEntry> {
        self.entries.get(entry.index())
    }

    /// Render the HTML page for the current entries without writing it.
    ///
    /// # Errors
    /// Returns an error when rendering fails.
    pub fn render_html(&self) -> Result<String, ReportError> {
        Ok(html::to_string(
            &self.config.document_title,
            &self.entries,
        )?)
    }

    #[cfg(feature = "json")]
    fn flush_json(&self) -> Result<(), ReportError> {
        if let Some(path) = &self.config.json_path {
            let document = crate::json::to_string(&self.config.report_name, &self.entries)?;
            write_report(path, document.as_bytes())?;
        }
        Ok(())
    }

    #[cfg(not(feature = "json"))]
    fn flush_json(&self) -> Result<(), ReportError> {
        if let Some(path) = &self.config.json_path {
            log::warn!("skipping JSON report {path}: the `json` feature is disabled");
        }
        Ok(())
    }
}

impl ReportSink for ReportSession {
    fn create_entry(&mut self, name: &str) -> EntryId {
        let entry = EntryId::new(self.entries.len());
        log::debug!("creating report entry {entry} for '{name}'");
        self.entries.push(ReportEntry::new(name));
        entry
    }

    fn log(
        &mut self,
        entry: EntryId,
        severity: Severity,
        message: &str,
    ) -> Result<(), ReportError> {
        let target = self
            .entries
            .get_mut(entry.index())
            .ok_or(ReportError::UnknownEntry(entry))?;
        target.push(LogLine::new(severity, message));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        let page = self.render_html()?;
        write_report(&self.config.html_path, page.as_bytes())?;
        if let Some(path) = &self.config.junit_path {
            let document = junit::to_string(&self.config.report_name, &self.entries)?;
            write_report(path, document.as_bytes())?;
        }
        self.flush_json()?;
        log::info!(
            "wrote report with {} entries to {}",
            self.entries.len(),
            self.config.html_path
        );
        Ok(())
    }
}

/// Write `contents` to `path`, creating missing parent directories.
fn write_report(path: &Utf8Path, contents: &[u8]) -> Result<(), ReportError> {
    let write_error = |source| ReportError::Write {
        path: path.to_owned(),
        source,
    };
    let file_name = path.file_name().ok_or_else(|| {
        write_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "report path has no file name",
        ))
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(write_error)?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(write_error)?;
    dir.write(file_name, contents).map_err(write_error)
}

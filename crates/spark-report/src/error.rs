//! Errors raised while recording or writing a report.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::EntryId;

/// Errors produced by a [`ReportSession`](crate::ReportSession).
#[derive(Debug, Error)]
pub enum ReportError {
    /// A log line referenced an entry the session never created.
    #[error("no report entry with handle {0}")]
    UnknownEntry(EntryId),

    /// Rendering a report document failed.
    #[error("failed to render report: {0}")]
    Render(#[from] std::fmt::Error),

    /// Serializing the JSON document failed.
    #[cfg(feature = "json")]
    #[error("failed to serialize JSON report: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing a report document to disk failed.
    #[error("failed to write report to {path}: {source}")]
    Write {
        /// Destination that could not be written.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

//! Report session and writers for Spark BDD runs.
//!
//! A [`ReportSession`] collects one [`ReportEntry`] per scenario together with
//! the severity-tagged [`LogLine`]s appended while the scenario runs. Flushing
//! the session renders the collected entries as a self-contained HTML page
//! and, when configured, as JSON and `JUnit` XML documents.
//!
//! # Examples
//!
//! ```
//! use spark_report::{ReportConfig, ReportSession, ReportSink, Severity};
//!
//! let mut session = ReportSession::new(ReportConfig::default());
//! let entry = session.create_entry("Get post");
//! session.log(entry, Severity::Info, "GET /posts/1").unwrap();
//! session.log(entry, Severity::Pass, "GET /posts/1 pass").unwrap();
//! assert_eq!(session.entries().len(), 1);
//! assert_eq!(session.entries()[0].status(), Severity::Pass);
//! ```

mod config;
mod entry;
mod error;
mod escape;
pub mod html;
#[cfg(feature = "json")]
pub mod json;
pub mod junit;
mod session;
mod severity;
mod summary;

pub use config::{DEFAULT_HTML_PATH, DEFAULT_REPORT_NAME, ReportConfig};
pub use entry::{EntryId, LogLine, ReportEntry};
pub use error::ReportError;
pub use session::{ReportSession, ReportSink};
pub use severity::Severity;
pub use summary::ReportSummary;

//! Output configuration for a report session.
//!
//! The embedding application decides where reports land. Only the HTML page
//! is written by default; JSON and `JUnit` outputs are opt-in.

use camino::{Utf8Path, Utf8PathBuf};

/// Default location of the HTML report.
pub const DEFAULT_HTML_PATH: &str = "target/Spark.html";

/// Default report name and document title.
pub const DEFAULT_REPORT_NAME: &str = "Spark";

/// Configuration consumed by [`ReportSession`](crate::ReportSession) on flush.
///
/// # Examples
/// ```
/// use spark_report::ReportConfig;
///
/// let config = ReportConfig::default()
///     .with_html_path("out/report.html")
///     .with_junit_path("out/junit.xml")
///     .with_document_title("API tests");
/// assert_eq!(config.html_path, "out/report.html");
/// assert_eq!(config.document_title, "API tests");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    /// Where the HTML page is written.
    pub html_path: Utf8PathBuf,
    /// Title shown in the browser tab and page header.
    pub document_title: String,
    /// Report name used as the `JUnit` suite name and JSON report name.
    pub report_name: String,
    /// Where the JSON document is written, if anywhere.
    pub json_path: Option<Utf8PathBuf>,
    /// Where the `JUnit` XML document is written, if anywhere.
    pub junit_path: Option<Utf8PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            html_path: Utf8PathBuf::from(DEFAULT_HTML_PATH),
            document_title: DEFAULT_REPORT_NAME.to_owned(),
            report_name: DEFAULT_REPORT_NAME.to_owned(),
            json_path: None,
            junit_path: None,
        }
    }
}

impl ReportConfig {
    /// Write the HTML page to `path`.
    #[must_use]
    pub fn with_html_path(mut self, path: impl AsRef<Utf8Path>) -> Self {
        self.html_path = path.as_ref().to_owned();
        self
    }

    /// Use `title` for the HTML document.
    #[must_use]
    pub fn with_document_title(mut self, title: impl Into<String>) -> Self {
        self.document_title = title.into();
        self
    }

    /// Use `name` for the `JUnit` suite and the JSON document.
    #[must_use]
    pub fn with_report_name(mut self, name: impl Into<String>) -> Self {
        self.report_name = name.into();
        self
    }

    /// Additionally write a JSON document to `path`.
    ///
    /// The document is only produced when the `json` feature is enabled.
    #[must_use]
    pub fn with_json_path(mut self, path: impl AsRef<Utf8Path>) -> Self {
        self.json_path = Some(path.as_ref().to_owned());
        self
    }

    /// Additionally write a `JUnit` XML document to `path`.
    #[must_use]
    pub fn with_junit_path(mut self, path: impl AsRef<Utf8Path>) -> Self {
        self.junit_path = Some(path.as_ref().to_owned());
        self
    }

    /// Place every output inside `dir`, keeping the configured file names.
    ///
    /// # Examples
    /// ```
    /// use spark_report::ReportConfig;
    ///
    /// let config = ReportConfig::default()
    ///     .with_junit_path("junit.xml")
    ///     .rooted_at("build");
    /// assert_eq!(config.html_path, "build/Spark.html");
    /// assert_eq!(config.junit_path.as_deref().map(|p| p.as_str()), Some("build/junit.xml"));
    /// ```
    #[must_use]
    pub fn rooted_at(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        let dir = dir.as_ref();
        let reroot = |path: &Utf8Path| match path.file_name() {
            Some(name) => dir.join(name),
            None => dir.to_owned(),
        };
        self.html_path = reroot(&self.html_path);
        self.json_path = self.json_path.as_deref().map(reroot);
        self.junit_path = self.junit_path.as_deref().map(reroot);
        self
    }
}

//! Error types for the bridge, feature loading and the step registry.

use camino::Utf8PathBuf;
use spark_report::ReportError;
use thiserror::Error;

use crate::event::EventKind;

/// Errors raised by the [`ReportingBridge`](crate::ReportingBridge).
///
/// Apart from [`Report`](Self::Report), every variant describes an event
/// that arrived out of order.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// An event arrived before `RunStarted`.
    #[error("{event} received before the test run started")]
    RunNotStarted {
        /// Kind of the offending event.
        event: EventKind,
    },

    /// `RunStarted` arrived twice.
    #[error("test run already started")]
    RunAlreadyStarted,

    /// An event arrived after the report was flushed.
    #[error("{event} received after the test run finished")]
    RunAlreadyFinished {
        /// Kind of the offending event.
        event: EventKind,
    },

    /// A step or scenario-finish event arrived while no scenario was open.
    #[error("{event} received with no active scenario")]
    NoActiveScenario {
        /// Kind of the offending event.
        event: EventKind,
    },

    /// A scenario started before the previous one finished.
    #[error("scenario '{incoming}' started while '{open}' is still open")]
    ScenarioAlreadyOpen {
        /// Name of the scenario still open.
        open: String,
        /// Name of the scenario that tried to start.
        incoming: String,
    },

    /// The report session failed.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Errors raised while loading Gherkin features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// The feature file could not be read.
    #[error("failed to read feature file {path}: {source}")]
    Read {
        /// Path of the feature file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The feature text is not valid Gherkin.
    #[error("failed to parse feature: {0}")]
    Parse(#[from] gherkin::ParseError),
}

/// Errors raised while registering step definitions.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The pattern uses a parameter type the registry does not know.
    #[error("unknown parameter type '{{{name}}}' in step pattern '{pattern}'")]
    UnknownParameterType {
        /// Parameter type name without braces.
        name: String,
        /// The offending pattern.
        pattern: String,
    },

    /// The pattern opens a parameter without closing it.
    #[error("unterminated parameter in step pattern '{0}'")]
    UnterminatedParameter(String),

    /// The compiled regular expression was rejected.
    #[error("invalid step pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Error reported by the regex engine.
        #[source]
        source: regex::Error,
    },
}

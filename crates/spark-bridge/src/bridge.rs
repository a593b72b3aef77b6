//! Listener mirroring runner lifecycle events into a report session.
//!
//! The bridge keeps the run state and a single "current scenario" slot. It
//! assumes sequential execution: each scenario finishes before the next one
//! starts, and events arrive in the documented order. Violations are
//! reported as [`BridgeError`]s instead of being silently ignored.

use spark_report::{EntryId, ReportConfig, ReportSession, ReportSink, Severity};

use crate::event::{
    EventKind, RunFinished, RunStarted, ScenarioFinished, ScenarioStarted, StepFinished,
    StepStarted, TestStep,
};
use crate::{BridgeError, EventListener, EventPublisher, RunnerStatus};

/// Message logged for failed steps that carry no error text.
const MISSING_ERROR_MESSAGE: &str = "step failed without an error message";

/// Lifecycle of the report session owned by a bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Waiting for `RunStarted`.
    NotStarted,
    /// Accepting scenario and step events.
    Running,
    /// The report was flushed; no further events are accepted.
    Flushed,
}

#[derive(Debug)]
struct OpenScenario {
    entry: EntryId,
    name: String,
}

/// Event listener writing one report entry per scenario.
///
/// | Event | Report effect |
/// |---|---|
/// | `RunStarted` | none |
/// | `ScenarioStarted` | new entry named after the scenario |
/// | `StepStarted` | `INFO` line with the step text |
/// | `StepFinished` | on failure a `FAIL` line with the error, then `<text> <severity>` |
/// | `ScenarioFinished` | `Scenario <severity>` |
/// | `RunFinished` | flush |
///
/// Hook steps produce no lines.
#[derive(Debug)]
pub struct ReportingBridge<S = ReportSession> {
    sink: S,
    state: RunState,
    current: Option<OpenScenario>,
    scenarios_started: usize,
}

impl ReportingBridge<ReportSession> {
    /// Bridge writing to a fresh session with the given configuration.
    #[must_use]
    pub fn with_config(config: ReportConfig) -> Self {
        Self::new(ReportSession::new(config))
    }
}

impl<S: ReportSink> ReportingBridge<S> {
    /// Bridge writing to `sink`.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            state: RunState::NotStarted,
            current: None,
            scenarios_started: 0,
        }
    }

    /// Current run state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Borrow the report sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Unwrap the report sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Number of scenarios reported so far.
    #[must_use]
    pub const fn scenarios_started(&self) -> usize {
        self.scenarios_started
    }

    /// Name of the scenario currently open, if any.
    #[must_use]
    pub fn current_scenario(&self) -> Option<&str> {
        self.current.as_ref().map(|open| open.name.as_str())
    }

    /// Handle `RunStarted`.
    ///
    /// # Errors
    /// Fails if the run already started or finished.
    pub fn run_started(&mut self, _event: &RunStarted) -> Result<(), BridgeError> {
        match self.state {
            RunState::NotStarted => {
                log::info!("test run started");
                self.state = RunState::Running;
                Ok(())
            }
            RunState::Running => Err(BridgeError::RunAlreadyStarted),
            RunState::Flushed => Err(BridgeError::RunAlreadyFinished {
                event: EventKind::RunStarted,
            }),
        }
    }

    /// Handle `RunFinished` by flushing the report.
    ///
    /// The run counts as finished before the flush is attempted, so a failed
    /// flush is never repeated. A scenario left open is logged and flushed
    /// with whatever lines it holds.
    ///
    /// # Errors
    /// Fails if the run never started, was already flushed, or if the sink
    /// cannot write the report.
    pub fn run_finished(&mut self, _event: &RunFinished) -> Result<(), BridgeError> {
        self.ensure_running(EventKind::RunFinished)?;
        if let Some(open) = self.current.take() {
            log::warn!(
                "scenario '{}' was still open when the run finished",
                open.name
            );
        }
        self.state = RunState::Flushed;
        self.sink.flush()?;
        log::info!(
            "test run finished after {} scenarios",
            self.scenarios_started
        );
        Ok(())
    }

    /// Handle `ScenarioStarted` by opening a new entry.
    ///
    /// # Errors
    /// Fails if the run is not running or another scenario is still open.
    pub fn scenario_started(&mut self, event: &ScenarioStarted) -> Result<(), BridgeError> {
        self.ensure_running(EventKind::ScenarioStarted)?;
        if let Some(open) = &self.current {
            return Err(BridgeError::ScenarioAlreadyOpen {
                open: open.name.clone(),
                incoming: event.name.clone(),
            });
        }
        let entry = self.sink.create_entry(&event.name);
        self.current = Some(OpenScenario {
            entry,
            name: event.name.clone(),
        });
        self.scenarios_started += 1;
        Ok(())
    }

    /// Handle `ScenarioFinished` by logging the scenario status and closing
    /// the entry.
    ///
    /// # Errors
    /// Fails if no scenario is open or the sink rejects the line.
    pub fn scenario_finished(&mut self, event: &ScenarioFinished) -> Result<(), BridgeError> {
        let entry = self.active_entry(EventKind::ScenarioFinished)?;
        self.current = None;
        let severity = event.result.status.severity();
        self.sink
            .log(entry, severity, &format!("Scenario {}", severity.label()))?;
        Ok(())
    }

    /// Handle `StepStarted` by logging the step text.
    ///
    /// # Errors
    /// Fails if no scenario is open or the sink rejects the line.
    pub fn step_started(&mut self, event: &StepStarted) -> Result<(), BridgeError> {
        let entry = self.active_entry(EventKind::StepStarted)?;
        let TestStep::Text(step) = &event.step else {
            return Ok(());
        };
        self.sink.log(entry, Severity::Info, &step.text)?;
        Ok(())
    }

    /// Handle `StepFinished` by logging the step outcome.
    ///
    /// # Errors
    /// Fails if no scenario is open or the sink rejects a line.
    pub fn step_finished(&mut self, event: &StepFinished) -> Result<(), BridgeError> {
        let entry = self.active_entry(EventKind::StepFinished)?;
        let TestStep::Text(step) = &event.step else {
            return Ok(());
        };
        let status = event.result.status;
        if status == RunnerStatus::Failed {
            let message = event
                .result
                .error
                .as_deref()
                .unwrap_or(MISSING_ERROR_MESSAGE);
            self.sink.log(entry, Severity::Fail, message)?;
        }
        let severity = status.severity();
        self.sink
            .log(entry, severity, &format!("{} {}", step.text, severity.label()))?;
        Ok(())
    }

    fn ensure_running(&self, event: EventKind) -> Result<(), BridgeError> {
        match self.state {
            RunState::Running => Ok(()),
            RunState::NotStarted => Err(BridgeError::RunNotStarted { event }),
            RunState::Flushed => Err(BridgeError::RunAlreadyFinished { event }),
        }
    }

    fn active_entry(&self, event: EventKind) -> Result<EntryId, BridgeError> {
        self.ensure_running(event)?;
        self.current
            .as_ref()
            .map(|open| open.entry)
            .ok_or(BridgeError::NoActiveScenario { event })
    }
}

impl<S: ReportSink + 'static> EventListener for ReportingBridge<S> {
    type Error = BridgeError;

    fn set_event_publisher(&self, publisher: &mut EventPublisher<Self>) {
        publisher.register_handler_for::<RunStarted>(Self::run_started);
        publisher.register_handler_for::<RunFinished>(Self::run_finished);
        publisher.register_handler_for::<ScenarioStarted>(Self::scenario_started);
        publisher.register_handler_for::<ScenarioFinished>(Self::scenario_finished);
        publisher.register_handler_for::<StepStarted>(Self::step_started);
        publisher.register_handler_for::<StepFinished>(Self::step_finished);
    }
}

//! Lifecycle events published by a test runner.
//!
//! A well-formed run publishes events in this order:
//! `RunStarted`, then for each scenario `ScenarioStarted`, a
//! `StepStarted`/`StepFinished` pair per step (hooks included), and
//! `ScenarioFinished`, and finally `RunFinished`.

use std::fmt;
use std::time::SystemTime;

use crate::RunnerStatus;

/// Discriminant of a [`TestEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`RunStarted`].
    RunStarted,
    /// See [`RunFinished`].
    RunFinished,
    /// See [`ScenarioStarted`].
    ScenarioStarted,
    /// See [`ScenarioFinished`].
    ScenarioFinished,
    /// See [`StepStarted`].
    StepStarted,
    /// See [`StepFinished`].
    StepFinished,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RunStarted => "RunStarted",
            Self::RunFinished => "RunFinished",
            Self::ScenarioStarted => "ScenarioStarted",
            Self::ScenarioFinished => "ScenarioFinished",
            Self::StepStarted => "StepStarted",
            Self::StepFinished => "StepFinished",
        };
        f.write_str(name)
    }
}

/// The test run began.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunStarted {
    /// When the run began.
    pub at: SystemTime,
}

impl RunStarted {
    /// Event stamped with the current time.
    #[must_use]
    pub fn now() -> Self {
        Self {
            at: SystemTime::now(),
        }
    }
}

/// The test run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunFinished {
    /// When the run ended.
    pub at: SystemTime,
}

impl RunFinished {
    /// Event stamped with the current time.
    #[must_use]
    pub fn now() -> Self {
        Self {
            at: SystemTime::now(),
        }
    }
}

/// A scenario began.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioStarted {
    /// Display name of the scenario.
    pub name: String,
    /// Tags inherited from the feature and declared on the scenario.
    pub tags: Vec<String>,
    /// One-based line of the scenario in its feature file, or zero if unknown.
    pub line: usize,
}

impl ScenarioStarted {
    /// Event for the scenario called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            line: 0,
        }
    }

    /// Attach tags to the event.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Attach the feature file line to the event.
    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// A scenario ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioFinished {
    /// Display name of the scenario.
    pub name: String,
    /// Final result of the scenario.
    pub result: TestResult,
}

impl ScenarioFinished {
    /// Event for the scenario called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, result: TestResult) -> Self {
        Self {
            name: name.into(),
            result,
        }
    }
}

/// A step began.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepStarted {
    /// The step about to run.
    pub step: TestStep,
}

impl StepStarted {
    /// Event for `step`.
    #[must_use]
    pub fn new(step: TestStep) -> Self {
        Self { step }
    }
}

/// A step ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepFinished {
    /// The step that ran.
    pub step: TestStep,
    /// Its result.
    pub result: TestResult,
}

impl StepFinished {
    /// Event for `step` with `result`.
    #[must_use]
    pub fn new(step: TestStep, result: TestResult) -> Self {
        Self { step, result }
    }
}

/// A unit of work inside a scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestStep {
    /// A Given/When/Then step written in the feature file.
    Text(TextStep),
    /// Setup or teardown code the runner wraps around a scenario.
    Hook(HookStep),
}

impl TestStep {
    /// A textual step with the given keyword and text.
    ///
    /// # Examples
    /// ```
    /// use spark_bridge::event::TestStep;
    ///
    /// let step = TestStep::text("When", "I send a GET request");
    /// assert_eq!(step.step_text(), Some("I send a GET request"));
    /// ```
    #[must_use]
    pub fn text(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text(TextStep {
            keyword: keyword.into(),
            text: text.into(),
            line: 0,
        })
    }

    /// A hook step of the given kind.
    #[must_use]
    pub const fn hook(kind: HookKind) -> Self {
        Self::Hook(HookStep { kind })
    }

    /// Text of the step, or `None` for hooks.
    #[must_use]
    pub fn step_text(&self) -> Option<&str> {
        match self {
            Self::Text(step) => Some(&step.text),
            Self::Hook(_) => None,
        }
    }
}

/// A step written in a feature file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextStep {
    /// Keyword as written, e.g. `Given` or `And`.
    pub keyword: String,
    /// Step text without the keyword.
    pub text: String,
    /// One-based line of the step in its feature file, or zero if unknown.
    pub line: usize,
}

/// A hook wrapped around a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HookStep {
    /// When the hook runs.
    pub kind: HookKind,
}

/// Position of a hook relative to its scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Runs before the first step.
    BeforeScenario,
    /// Runs after the last step, whatever the outcome.
    AfterScenario,
}

/// Result of a step or scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestResult {
    /// Final status.
    pub status: RunnerStatus,
    /// Error message, normally present when the status is `Failed`.
    pub error: Option<String>,
    /// Why the step was skipped, when the step gave a reason.
    pub skip_reason: Option<String>,
}

impl TestResult {
    /// A result with the given status and no error.
    #[must_use]
    pub const fn new(status: RunnerStatus) -> Self {
        Self {
            status,
            error: None,
            skip_reason: None,
        }
    }

    /// A passed result.
    #[must_use]
    pub const fn passed() -> Self {
        Self::new(RunnerStatus::Passed)
    }

    /// A skipped result.
    #[must_use]
    pub const fn skipped() -> Self {
        Self::new(RunnerStatus::Skipped)
    }

    /// A skipped result explaining why.
    #[must_use]
    pub fn skipped_because(reason: impl Into<String>) -> Self {
        Self {
            skip_reason: Some(reason.into()),
            ..Self::skipped()
        }
    }

    /// A failed result carrying `error`.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(RunnerStatus::Failed)
        }
    }
}

/// Any lifecycle event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestEvent {
    /// See [`RunStarted`].
    RunStarted(RunStarted),
    /// See [`RunFinished`].
    RunFinished(RunFinished),
    /// See [`ScenarioStarted`].
    ScenarioStarted(ScenarioStarted),
    /// See [`ScenarioFinished`].
    ScenarioFinished(ScenarioFinished),
    /// See [`StepStarted`].
    StepStarted(StepStarted),
    /// See [`StepFinished`].
    StepFinished(StepFinished),
}

impl TestEvent {
    /// Kind of the wrapped event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::RunStarted(_) => EventKind::RunStarted,
            Self::RunFinished(_) => EventKind::RunFinished,
            Self::ScenarioStarted(_) => EventKind::ScenarioStarted,
            Self::ScenarioFinished(_) => EventKind::ScenarioFinished,
            Self::StepStarted(_) => EventKind::StepStarted,
            Self::StepFinished(_) => EventKind::StepFinished,
        }
    }
}

/// A concrete event type that handlers can be registered for.
pub trait Event: Sized {
    /// Kind shared by every value of this type.
    const KIND: EventKind;

    /// Borrow the concrete event out of `event` if the kinds match.
    fn from_event(event: &TestEvent) -> Option<&Self>;
}

macro_rules! impl_event {
    ($($name:ident),+ $(,)?) => {
        $(
            impl Event for $name {
                const KIND: EventKind = EventKind::$name;

                fn from_event(event: &TestEvent) -> Option<&Self> {
                    match event {
                        TestEvent::$name(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$name> for TestEvent {
                fn from(event: $name) -> Self {
                    Self::$name(event)
                }
            }
        )+
    };
}

impl_event!(
    RunStarted,
    RunFinished,
    ScenarioStarted,
    ScenarioFinished,
    StepStarted,
    StepFinished,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_convert_and_report_their_kind() {
        let event = TestEvent::from(ScenarioStarted::new("Get post"));
        assert_eq!(event.kind(), EventKind::ScenarioStarted);
        assert_eq!(event.kind(), ScenarioStarted::KIND);
        assert!(ScenarioStarted::from_event(&event).is_some_and(|e| e.name == "Get post"));
        assert!(StepStarted::from_event(&event).is_none());
    }

    #[test]
    fn hooks_have_no_step_text() {
        assert_eq!(TestStep::hook(HookKind::BeforeScenario).step_text(), None);
    }

    #[test]
    fn failed_results_carry_their_error() {
        let result = TestResult::failed("Expected 200 but got 404");
        assert_eq!(result.status, RunnerStatus::Failed);
        assert_eq!(result.error.as_deref(), Some("Expected 200 but got 404"));
        assert_eq!(TestResult::skipped().error, None);
    }
}

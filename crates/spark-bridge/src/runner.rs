//! Sequential execution of compiled scenarios.
//!
//! The runner is the event source for an [`EventBus`]: every scenario is
//! wrapped in before and after hook steps, each step is reported with a
//! start and finish event, and the whole run is framed by `RunStarted` and
//! `RunFinished`.

use gherkin::Feature;

use crate::event::{
    HookKind, RunFinished, RunStarted, ScenarioFinished, ScenarioStarted, StepFinished,
    StepStarted, TestResult, TestStep, TextStep,
};
use crate::registry::catch_step_panic;
use crate::{
    CompiledScenario, CompiledStep, EventBus, EventListener, RunnerStatus, StepDefinitions,
    StepInvocation, StepOutcome, compile_scenarios,
};

/// Scenario counts of a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Scenarios executed.
    pub scenarios: usize,
    /// Scenarios whose steps all passed.
    pub passed: usize,
    /// Scenarios with a failed step or hook.
    pub failed: usize,
    /// Scenarios stopped by a skipped step.
    pub skipped: usize,
    /// Scenarios stopped by an undefined step.
    pub unknown: usize,
}

impl RunSummary {
    /// Whether no scenario failed or hit an undefined step.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0 && self.unknown == 0
    }

    fn record(&mut self, status: RunnerStatus) {
        self.scenarios += 1;
        match status {
            RunnerStatus::Passed => self.passed += 1,
            RunnerStatus::Failed => self.failed += 1,
            RunnerStatus::Skipped => self.skipped += 1,
            RunnerStatus::Unknown => self.unknown += 1,
        }
    }
}

/// Running status of one scenario.
#[derive(Debug)]
struct ScenarioProgress {
    status: RunnerStatus,
    error: Option<String>,
    skip_reason: Option<String>,
}

impl ScenarioProgress {
    const fn new() -> Self {
        Self {
            status: RunnerStatus::Passed,
            error: None,
            skip_reason: None,
        }
    }

    fn record(&mut self, outcome: &StepOutcome) {
        self.status = self.status.worst(outcome.status());
        if self.error.is_none() {
            self.error = outcome.error().map(str::to_owned);
        }
        if self.skip_reason.is_none() {
            self.skip_reason = outcome.skip_reason().map(str::to_owned);
        }
    }

    fn is_blocked(&self) -> bool {
        self.status != RunnerStatus::Passed
    }

    fn into_result(self) -> TestResult {
        TestResult {
            status: self.status,
            error: self.error,
            skip_reason: self.skip_reason,
        }
    }
}

/// Runs scenarios one after another and publishes their lifecycle events.
///
/// Once a step or the before hook does not pass, the remaining steps are
/// reported as skipped. The after hook always runs. A panic in the step
/// definitions fails the step or hook that raised it and the run goes on.
#[derive(Debug)]
pub struct FeatureRunner<D> {
    definitions: D,
}

impl<D: StepDefinitions> FeatureRunner<D> {
    /// Runner executing steps with `definitions`.
    #[must_use]
    pub fn new(definitions: D) -> Self {
        Self { definitions }
    }

    /// Borrow the step definitions.
    #[must_use]
    pub fn definitions(&self) -> &D {
        &self.definitions
    }

    /// Unwrap the step definitions.
    #[must_use]
    pub fn into_definitions(self) -> D {
        self.definitions
    }

    /// Run every scenario of `features` as one test run.
    ///
    /// # Errors
    /// Stops at, and returns, the first error raised by the listener.
    pub fn run<L: EventListener>(
        &mut self,
        bus: &mut EventBus<L>,
        features: &[Feature],
    ) -> Result<RunSummary, L::Error> {
        let scenarios: Vec<_> = features.iter().flat_map(compile_scenarios).collect();
        self.run_scenarios(bus, &scenarios)
    }

    /// Run already compiled scenarios as one test run.
    ///
    /// # Errors
    /// Stops at, and returns, the first error raised by the listener.
    pub fn run_scenarios<L: EventListener>(
        &mut self,
        bus: &mut EventBus<L>,
        scenarios: &[CompiledScenario],
    ) -> Result<RunSummary, L::Error> {
        log::info!("running {} scenarios", scenarios.len());
        bus.publish(RunStarted::now())?;
        let mut summary = RunSummary::default();
        for scenario in scenarios {
            let status = self.run_scenario(bus, scenario)?;
            summary.record(status);
        }
        bus.publish(RunFinished::now())?;
        Ok(summary)
    }

    fn run_scenario<L: EventListener>(
        &mut self,
        bus: &mut EventBus<L>,
        scenario: &CompiledScenario,
    ) -> Result<RunnerStatus, L::Error> {
        bus.publish(
            ScenarioStarted::new(&scenario.name)
                .with_tags(scenario.tags.clone())
                .at_line(scenario.line),
        )?;
        let mut progress = ScenarioProgress::new();

        let definitions = &mut self.definitions;
        let before = catch_step_panic(|| definitions.before_scenario(scenario));
        publish_step(bus, TestStep::hook(HookKind::BeforeScenario), &before)?;
        progress.record(&before);

        for step in &scenario.steps {
            let test_step = text_step(step);
            bus.publish(StepStarted::new(test_step.clone()))?;
            let outcome = if progress.is_blocked() {
                StepOutcome::Skipped(None)
            } else {
                let invocation = StepInvocation {
                    keyword: &step.keyword,
                    text: &step.text,
                    docstring: step.docstring.as_deref(),
                    table: step.table.as_deref(),
                };
                catch_step_panic(|| definitions.run_step(&invocation))
            };
            bus.publish(StepFinished::new(test_step, result_of(&outcome)))?;
            progress.record(&outcome);
        }

        let after = catch_step_panic(|| definitions.after_scenario(scenario));
        publish_step(bus, TestStep::hook(HookKind::AfterScenario), &after)?;
        progress.record(&after);

        let result = progress.into_result();
        let status = result.status;
        log::debug!("scenario '{}' finished: {status}", scenario.name);
        bus.publish(ScenarioFinished::new(&scenario.name, result))?;
        Ok(status)
    }
}

fn text_step(step: &CompiledStep) -> TestStep {
    TestStep::Text(TextStep {
        keyword: step.keyword.clone(),
        text: step.text.clone(),
        line: step.line,
    })
}

fn result_of(outcome: &StepOutcome) -> TestResult {
    TestResult {
        status: outcome.status(),
        error: outcome.error().map(str::to_owned),
        skip_reason: outcome.skip_reason().map(str::to_owned),
    }
}

fn publish_step<L: EventListener>(
    bus: &mut EventBus<L>,
    step: TestStep,
    outcome: &StepOutcome,
) -> Result<(), L::Error> {
    bus.publish(StepStarted::new(step.clone()))?;
    bus.publish(StepFinished::new(step, result_of(outcome)))
}

#[cfg(test)]
mod tests;

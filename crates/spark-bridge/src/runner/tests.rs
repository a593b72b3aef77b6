//! Unit tests for the feature runner.

use std::convert::Infallible;

use super::*;
use crate::event::{TestEvent, TestResult};
use crate::{EventPublisher, StepArgs, StepRegistry, parse_feature};
use rstest::{fixture, rstest};

/// Listener recording a compact trace of every event.
#[derive(Debug, Default)]
struct Trace(Vec<String>);

impl Trace {
    fn push(&mut self, line: String) -> Result<(), Infallible> {
        self.0.push(line);
        Ok(())
    }

    fn describe(step: &TestStep) -> String {
        match step {
            TestStep::Text(text) => text.text.clone(),
            TestStep::Hook(hook) => format!("{:?}", hook.kind),
        }
    }

    fn status(result: &TestResult) -> String {
        match &result.error {
            Some(error) => format!("{} ({error})", result.status),
            None => result.status.to_string(),
        }
    }

    fn run_started(&mut self, _: &RunStarted) -> Result<(), Infallible> {
        self.push("run started".to_owned())
    }

    fn run_finished(&mut self, _: &RunFinished) -> Result<(), Infallible> {
        self.push("run finished".to_owned())
    }

    fn scenario_started(&mut self, event: &ScenarioStarted) -> Result<(), Infallible> {
        self.push(format!("scenario {}", event.name))
    }

    fn scenario_finished(&mut self, event: &ScenarioFinished) -> Result<(), Infallible> {
        self.push(format!("scenario {}: {}", event.name, Self::status(&event.result)))
    }

    fn step_finished(&mut self, event: &StepFinished) -> Result<(), Infallible> {
        self.push(format!(
            "{}: {}",
            Self::describe(&event.step),
            Self::status(&event.result)
        ))
    }
}

impl EventListener for Trace {
    type Error = Infallible;

    fn set_event_publisher(&self, publisher: &mut EventPublisher<Self>) {
        publisher.register_handler_for::<RunStarted>(Self::run_started);
        publisher.register_handler_for::<RunFinished>(Self::run_finished);
        publisher.register_handler_for::<ScenarioStarted>(Self::scenario_started);
        publisher.register_handler_for::<ScenarioFinished>(Self::scenario_finished);
        publisher.register_handler_for::<StepFinished>(Self::step_finished);
    }
}

fn ok(_world: &mut (), _args: &StepArgs) -> eyre::Result<()> {
    Ok(())
}

fn fail(_world: &mut (), _args: &StepArgs) -> eyre::Result<()> {
    eyre::bail!("expected 200 but was 404")
}

#[fixture]
fn runner() -> FeatureRunner<StepRegistry<()>> {
    let registry = StepRegistry::new()
        .given("the API is available", ok)
        .and_then(|r| r.when("I send a GET request", ok))
        .and_then(|r| r.then("the status code is {int}", ok))
        .and_then(|r| r.then("the request fails", fail))
        .unwrap_or_else(|e| panic!("registry: {e}"));
    FeatureRunner::new(registry)
}

fn run(runner: &mut FeatureRunner<StepRegistry<()>>, text: &str) -> (RunSummary, Vec<String>) {
    let feature = parse_feature(text).unwrap_or_else(|e| panic!("parse: {e}"));
    let mut bus = EventBus::new(Trace::default());
    let Ok(summary) = runner.run(&mut bus, &[feature]);
    (summary, bus.into_listener().0)
}

#[rstest]
fn publishes_the_full_event_sequence(mut runner: FeatureRunner<StepRegistry<()>>) {
    let (summary, trace) = run(
        &mut runner,
        "Feature: Posts\n  Scenario: Get post\n    Given the API is available\n    Then the status code is 200\n",
    );
    assert_eq!(
        trace,
        [
            "run started",
            "scenario Get post",
            "BeforeScenario: PASSED",
            "the API is available: PASSED",
            "the status code is 200: PASSED",
            "AfterScenario: PASSED",
            "scenario Get post: PASSED",
            "run finished",
        ]
    );
    assert_eq!(summary.passed, 1);
    assert!(summary.is_success());
}

#[rstest]
fn steps_after_a_failure_are_skipped(mut runner: FeatureRunner<StepRegistry<()>>) {
    let (summary, trace) = run(
        &mut runner,
        "Feature: Posts\n  Scenario: Broken\n    Given the request fails\n    Then the status code is 200\n",
    );
    assert_eq!(
        trace.get(3..6),
        Some(
            [
                "the request fails: FAILED (expected 200 but was 404)".to_owned(),
                "the status code is 200: SKIPPED".to_owned(),
                "AfterScenario: PASSED".to_owned(),
            ]
            .as_slice()
        )
    );
    assert_eq!(
        trace.get(6).map(String::as_str),
        Some("scenario Broken: FAILED (expected 200 but was 404)")
    );
    assert_eq!(summary.failed, 1);
    assert!(!summary.is_success());
}

#[rstest]
fn undefined_steps_are_unknown(mut runner: FeatureRunner<StepRegistry<()>>) {
    let (summary, trace) = run(
        &mut runner,
        "Feature: Posts\n  Scenario: Missing\n    Given something nobody wrote\n    Then the status code is 200\n",
    );
    assert!(trace.contains(&"something nobody wrote: UNKNOWN".to_owned()));
    assert!(trace.contains(&"the status code is 200: SKIPPED".to_owned()));
    assert!(trace.contains(&"scenario Missing: UNKNOWN".to_owned()));
    assert_eq!(summary.unknown, 1);
    assert!(!summary.is_success());
}

#[rstest]
fn counts_every_scenario(mut runner: FeatureRunner<StepRegistry<()>>) {
    let (summary, _) = run(
        &mut runner,
        "Feature: Posts\n\
         \x20 Scenario Outline: Status\n\
         \x20   Then the status code is <code>\n\
         \x20   Examples:\n\
         \x20     | code |\n\
         \x20     | 200  |\n\
         \x20     | 404  |\n\
         \x20 Scenario: Broken\n\
         \x20   Given the request fails\n",
    );
    assert_eq!(
        summary,
        RunSummary {
            scenarios: 3,
            passed: 2,
            failed: 1,
            skipped: 0,
            unknown: 0,
        }
    );
}

/// Definitions whose before hook fails.
struct BrokenSetup;

impl StepDefinitions for BrokenSetup {
    fn before_scenario(&mut self, _scenario: &CompiledScenario) -> StepOutcome {
        StepOutcome::Failed("database unavailable".to_owned())
    }

    fn run_step(&mut self, _step: &StepInvocation<'_>) -> StepOutcome {
        StepOutcome::Passed
    }
}

#[test]
fn failed_before_hook_skips_all_steps() {
    let feature = parse_feature("Feature: Posts\n  Scenario: Get post\n    Given the API is available\n")
        .unwrap_or_else(|e| panic!("parse: {e}"));
    let mut bus = EventBus::new(Trace::default());
    let mut runner = FeatureRunner::new(BrokenSetup);
    let Ok(summary) = runner.run(&mut bus, &[feature]);
    let trace = bus.into_listener().0;
    assert!(trace.contains(&"BeforeScenario: FAILED (database unavailable)".to_owned()));
    assert!(trace.contains(&"the API is available: SKIPPED".to_owned()));
    assert_eq!(summary.failed, 1);
}

#[test]
fn step_events_carry_keyword_and_line() {
    let scenario = CompiledScenario {
        name: "s".to_owned(),
        tags: Vec::new(),
        line: 3,
        steps: vec![CompiledStep {
            keyword: "And".to_owned(),
            text: "the API is available".to_owned(),
            line: 4,
            docstring: None,
            table: None,
        }],
    };
    assert_eq!(
        scenario.steps.first().map(text_step),
        Some(TestStep::Text(TextStep {
            keyword: "And".to_owned(),
            text: "the API is available".to_owned(),
            line: 4,
        }))
    );
}

#[test]
fn results_mirror_outcomes() {
    assert_eq!(result_of(&StepOutcome::Passed), TestResult::passed());
    assert_eq!(
        result_of(&StepOutcome::Failed("boom".to_owned())),
        TestResult::failed("boom")
    );
    assert_eq!(result_of(&StepOutcome::Skipped(None)), TestResult::skipped());
    assert_eq!(
        result_of(&StepOutcome::Skipped(Some("offline".to_owned()))),
        TestResult::skipped_because("offline")
    );
    assert!(matches!(
        TestEvent::from(StepStarted::new(TestStep::hook(HookKind::AfterScenario))),
        TestEvent::StepStarted(_)
    ));
}

/// Listener keeping the result of every finished text step.
#[derive(Debug, Default)]
struct StepResults(Vec<TestResult>);

impl StepResults {
    fn step_finished(&mut self, event: &StepFinished) -> Result<(), Infallible> {
        if let TestStep::Text(_) = event.step {
            self.0.push(event.result.clone());
        }
        Ok(())
    }
}

impl EventListener for StepResults {
    type Error = Infallible;

    fn set_event_publisher(&self, publisher: &mut EventPublisher<Self>) {
        publisher.register_handler_for::<StepFinished>(Self::step_finished);
    }
}

fn offline(_world: &mut (), _args: &StepArgs) -> eyre::Result<()> {
    Err(crate::SkipStep::because("network disabled").into())
}

#[test]
fn skip_reasons_reach_step_results() {
    let registry = StepRegistry::new()
        .given("the API is available", offline)
        .unwrap_or_else(|e| panic!("registry: {e}"));
    let feature = parse_feature("Feature: Posts\n  Scenario: Offline\n    Given the API is available\n")
        .unwrap_or_else(|e| panic!("parse: {e}"));
    let mut bus = EventBus::new(StepResults::default());
    let Ok(summary) = FeatureRunner::new(registry).run(&mut bus, &[feature]);
    assert_eq!(
        bus.into_listener().0,
        [TestResult::skipped_because("network disabled")]
    );
    assert_eq!(summary.skipped, 1);
}

/// Definitions that panic wherever they are asked to run.
struct Panicking;

impl StepDefinitions for Panicking {
    fn run_step(&mut self, step: &StepInvocation<'_>) -> StepOutcome {
        panic!("cannot run '{}'", step.text)
    }

    fn after_scenario(&mut self, _scenario: &CompiledScenario) -> StepOutcome {
        panic!("teardown exploded")
    }
}

#[test]
fn panicking_definitions_fail_without_aborting_the_run() {
    let feature = parse_feature(
        "Feature: Posts\n  Scenario: First\n    Given the API is available\n  Scenario: Second\n    Given the API is available\n",
    )
    .unwrap_or_else(|e| panic!("parse: {e}"));
    let mut bus = EventBus::new(Trace::default());
    let Ok(summary) = FeatureRunner::new(Panicking).run(&mut bus, &[feature]);
    let trace = bus.into_listener().0;
    assert!(trace.contains(
        &"the API is available: FAILED (cannot run 'the API is available')".to_owned()
    ));
    assert!(trace.contains(&"AfterScenario: FAILED (teardown exploded)".to_owned()));
    assert_eq!(trace.last().map(String::as_str), Some("run finished"));
    assert_eq!(summary.failed, 2);
}

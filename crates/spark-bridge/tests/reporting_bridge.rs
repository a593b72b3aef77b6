//! Behavioural tests for the reporting bridge driven through an event bus.

use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use spark_bridge::event::{
    EventKind, HookKind, RunFinished, RunStarted, ScenarioFinished, ScenarioStarted,
    StepFinished, StepStarted, TestEvent, TestResult, TestStep,
};
use spark_bridge::{BridgeError, EventBus, ReportingBridge, RunState, RunnerStatus};
use spark_report::{ReportConfig, Severity};
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

#[fixture]
fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let root = Utf8Path::from_path(dir.path())
        .map(Utf8Path::to_owned)
        .unwrap_or_else(|| panic!("temporary directory should be UTF-8"));
    Workspace { _dir: dir, root }
}

#[fixture]
fn bus(workspace: Workspace) -> (Workspace, EventBus<ReportingBridge>) {
    let config = ReportConfig::default().rooted_at(&workspace.root);
    (workspace, EventBus::new(ReportingBridge::with_config(config)))
}

fn publish_all(bus: &mut EventBus<ReportingBridge>, events: Vec<TestEvent>) {
    for event in events {
        let kind = event.kind();
        bus.publish(event)
            .unwrap_or_else(|e| panic!("publishing {kind} failed: {e}"));
    }
}

fn scenario(name: &str, steps: &[(&str, TestResult)], result: TestResult) -> Vec<TestEvent> {
    let mut events = vec![ScenarioStarted::new(name).into()];
    for (text, step_result) in steps {
        let step = TestStep::text("Given", *text);
        events.push(StepStarted::new(step.clone()).into());
        events.push(StepFinished::new(step, step_result.clone()).into());
    }
    events.push(ScenarioFinished::new(name, result).into());
    events
}

fn log_lines(bus: &EventBus<ReportingBridge>, index: usize) -> Vec<(Severity, String)> {
    bus.listener()
        .sink()
        .entries()
        .get(index)
        .map(|entry| {
            entry
                .logs()
                .iter()
                .map(|l| (l.severity(), l.message().to_owned()))
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
fn passing_scenario_produces_three_lines(bus: (Workspace, EventBus<ReportingBridge>)) {
    let (workspace, mut bus) = bus;
    let mut events: Vec<TestEvent> = vec![RunStarted::now().into()];
    events.extend(scenario(
        "Get post",
        &[("GET /posts/1", TestResult::passed())],
        TestResult::passed(),
    ));
    events.push(RunFinished::now().into());
    publish_all(&mut bus, events);

    let entries = bus.listener().sink().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries.first().map(|e| e.name()), Some("Get post"));
    assert_eq!(
        log_lines(&bus, 0),
        [
            (Severity::Info, "GET /posts/1".to_owned()),
            (Severity::Pass, "GET /posts/1 pass".to_owned()),
            (Severity::Pass, "Scenario pass".to_owned()),
        ]
    );
    assert_eq!(bus.listener().state(), RunState::Flushed);
    assert!(workspace.root.join("Spark.html").is_file());
}

#[rstest]
fn failing_step_logs_error_then_summary(bus: (Workspace, EventBus<ReportingBridge>)) {
    let (_workspace, mut bus) = bus;
    let mut events: Vec<TestEvent> = vec![RunStarted::now().into()];
    events.extend(scenario(
        "Get missing post",
        &[(
            "GET /posts/9999",
            TestResult::failed("Expected 200 but got 404"),
        )],
        TestResult::failed("Expected 200 but got 404"),
    ));
    events.push(RunFinished::now().into());
    publish_all(&mut bus, events);

    assert_eq!(
        log_lines(&bus, 0),
        [
            (Severity::Info, "GET /posts/9999".to_owned()),
            (Severity::Fail, "Expected 200 but got 404".to_owned()),
            (Severity::Fail, "GET /posts/9999 fail".to_owned()),
            (Severity::Fail, "Scenario fail".to_owned()),
        ]
    );
}

#[rstest]
#[case::none(0)]
#[case::one(1)]
#[case::several(4)]
fn one_entry_per_started_scenario(
    bus: (Workspace, EventBus<ReportingBridge>),
    #[case] scenarios: usize,
) {
    let (_workspace, mut bus) = bus;
    let mut events: Vec<TestEvent> = vec![RunStarted::now().into()];
    for n in 0..scenarios {
        events.extend(scenario(
            &format!("scenario {n}"),
            &[("a step", TestResult::skipped())],
            TestResult::skipped(),
        ));
    }
    events.push(RunFinished::now().into());
    publish_all(&mut bus, events);

    assert_eq!(bus.listener().sink().entries().len(), scenarios);
    assert_eq!(bus.listener().scenarios_started(), scenarios);
}

#[rstest]
#[case::passed(RunnerStatus::Passed, Severity::Pass)]
#[case::failed(RunnerStatus::Failed, Severity::Fail)]
#[case::skipped(RunnerStatus::Skipped, Severity::Skip)]
#[case::unrecognized(RunnerStatus::from_label("pending"), Severity::Pass)]
fn step_status_maps_to_severity(
    bus: (Workspace, EventBus<ReportingBridge>),
    #[case] status: RunnerStatus,
    #[case] expected: Severity,
) {
    let (_workspace, mut bus) = bus;
    let mut events: Vec<TestEvent> = vec![RunStarted::now().into()];
    events.extend(scenario(
        "mapped",
        &[("a step", TestResult::new(status))],
        TestResult::new(status),
    ));
    publish_all(&mut bus, events);

    let summary = format!("a step {}", expected.label());
    assert!(log_lines(&bus, 0).contains(&(expected, summary)));
}

#[rstest]
fn hooks_produce_no_lines(bus: (Workspace, EventBus<ReportingBridge>)) {
    let (_workspace, mut bus) = bus;
    let before = TestStep::hook(HookKind::BeforeScenario);
    let after = TestStep::hook(HookKind::AfterScenario);
    publish_all(
        &mut bus,
        vec![
            RunStarted::now().into(),
            ScenarioStarted::new("hooks only").into(),
            StepStarted::new(before.clone()).into(),
            StepFinished::new(before, TestResult::passed()).into(),
            StepStarted::new(after.clone()).into(),
            StepFinished::new(after, TestResult::failed("teardown failed")).into(),
        ],
    );
    assert!(log_lines(&bus, 0).is_empty());
}

#[rstest]
fn second_run_finished_is_an_error(bus: (Workspace, EventBus<ReportingBridge>)) {
    let (_workspace, mut bus) = bus;
    publish_all(
        &mut bus,
        vec![RunStarted::now().into(), RunFinished::now().into()],
    );
    let result = bus.publish(RunFinished::now());
    assert!(matches!(
        result,
        Err(BridgeError::RunAlreadyFinished {
            event: EventKind::RunFinished
        })
    ));
}

#[rstest]
fn step_without_scenario_is_an_error(bus: (Workspace, EventBus<ReportingBridge>)) {
    let (_workspace, mut bus) = bus;
    publish_all(&mut bus, vec![RunStarted::now().into()]);
    let result = bus.publish(StepStarted::new(TestStep::text("Given", "orphan")));
    assert!(matches!(
        result,
        Err(BridgeError::NoActiveScenario {
            event: EventKind::StepStarted
        })
    ));
}

#[rstest]
fn overlapping_scenarios_are_an_error(bus: (Workspace, EventBus<ReportingBridge>)) {
    let (_workspace, mut bus) = bus;
    publish_all(
        &mut bus,
        vec![
            RunStarted::now().into(),
            ScenarioStarted::new("first").into(),
        ],
    );
    let result = bus.publish(ScenarioStarted::new("second"));
    assert!(matches!(result, Err(BridgeError::ScenarioAlreadyOpen { .. })));
    assert_eq!(bus.listener().sink().entries().len(), 1);
}

#[test]
fn unwritable_report_path_surfaces_the_error() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let root = Utf8Path::from_path(dir.path())
        .map(Utf8Path::to_owned)
        .unwrap_or_else(|| panic!("temporary directory should be UTF-8"));
    // A regular file where the report directory should be.
    let blocker = root.join("blocked");
    std::fs::write(&blocker, "not a directory").unwrap_or_else(|e| panic!("write: {e}"));
    let config = ReportConfig::default().with_html_path(blocker.join("Spark.html"));
    let mut bus = EventBus::new(ReportingBridge::with_config(config));

    publish_all(&mut bus, vec![RunStarted::now().into()]);
    let result = bus.publish(RunFinished::now());
    assert!(matches!(result, Err(BridgeError::Report(_))));
    assert_eq!(bus.listener().state(), RunState::Flushed);
}

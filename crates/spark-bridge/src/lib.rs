//! Reporting bridge for sequential BDD runs.
//!
//! A test runner publishes lifecycle events (run, scenario and step start and
//! finish) through an [`EventBus`]. The [`ReportingBridge`] listens to those
//! events and mirrors them into a [`spark_report::ReportSession`], flushing
//! the report exactly once when the run finishes.
//!
//! The crate also provides the runner side: [`FeatureRunner`] executes parsed
//! Gherkin features against a [`StepRegistry`] and publishes the events.
//!
//! # Examples
//!
//! ```
//! use spark_bridge::event::{
//!     RunStarted, ScenarioFinished, ScenarioStarted, StepFinished, StepStarted, TestResult,
//!     TestStep,
//! };
//! use spark_bridge::{EventBus, ReportingBridge};
//! use spark_report::{ReportConfig, ReportSession, Severity};
//!
//! let bridge = ReportingBridge::new(ReportSession::new(ReportConfig::default()));
//! let mut bus = EventBus::new(bridge);
//! let step = TestStep::text("Given", "GET /posts/1");
//! bus.publish(RunStarted::now()).unwrap();
//! bus.publish(ScenarioStarted::new("Get post")).unwrap();
//! bus.publish(StepStarted::new(step.clone())).unwrap();
//! bus.publish(StepFinished::new(step, TestResult::passed())).unwrap();
//! bus.publish(ScenarioFinished::new("Get post", TestResult::passed())).unwrap();
//!
//! let entries = bus.listener().sink().entries();
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].logs().len(), 3);
//! assert_eq!(entries[0].status(), Severity::Pass);
//! ```

mod bridge;
mod error;
pub mod event;
mod feature;
mod publisher;
mod registry;
mod runner;
mod status;

pub use bridge::{ReportingBridge, RunState};
pub use error::{BridgeError, FeatureError, RegistryError};
pub use feature::{CompiledScenario, CompiledStep, compile_scenarios, load_feature, parse_feature};
pub use gherkin::Feature;
pub use publisher::{EventBus, EventListener, EventPublisher};
pub use registry::{
    SkipStep, StepArgs, StepDefinitions, StepHandler, StepInvocation, StepOutcome, StepRegistry,
};
pub use runner::{FeatureRunner, RunSummary};
pub use status::RunnerStatus;

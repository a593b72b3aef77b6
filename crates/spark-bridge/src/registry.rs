//! Step definitions and their lookup.
//!
//! [`StepDefinitions`] is the seam between the runner and glue code. The
//! provided [`StepRegistry`] matches step text against Cucumber-style
//! patterns and runs the matching handler against a per-scenario world.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use eyre::eyre;
use regex::Regex;

use crate::{CompiledScenario, RegistryError, RunnerStatus};

mod pattern;

/// Result of running one step or hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step completed.
    Passed,
    /// The step failed with the given message.
    Failed(String),
    /// The step asked to be skipped, optionally saying why.
    Skipped(Option<String>),
    /// No definition matches the step text.
    Undefined,
}

impl StepOutcome {
    /// Runner status reported for this outcome.
    #[must_use]
    pub const fn status(&self) -> RunnerStatus {
        match self {
            Self::Passed => RunnerStatus::Passed,
            Self::Failed(_) => RunnerStatus::Failed,
            Self::Skipped(_) => RunnerStatus::Skipped,
            Self::Undefined => RunnerStatus::Unknown,
        }
    }

    /// Failure message, if the outcome is a failure.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Skip reason, if the outcome is a skip that gave one.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        match self {
            Self::Skipped(reason) => reason.as_deref(),
            _ => None,
        }
    }
}

/// A step as handed to [`StepDefinitions::run_step`].
#[derive(Clone, Copy, Debug)]
pub struct StepInvocation<'a> {
    /// Keyword as written.
    pub keyword: &'a str,
    /// Step text without the keyword.
    pub text: &'a str,
    /// Attached doc string.
    pub docstring: Option<&'a str>,
    /// Attached data table rows.
    pub table: Option<&'a [Vec<String>]>,
}

/// Runs scenario steps for a [`FeatureRunner`](crate::FeatureRunner).
///
/// A panic raised by any method is caught by the runner and reported as a
/// failure of the step or hook that raised it.
pub trait StepDefinitions {
    /// Prepare for `scenario`. Runs before its first step.
    fn before_scenario(&mut self, _scenario: &CompiledScenario) -> StepOutcome {
        StepOutcome::Passed
    }

    /// Run a single step.
    fn run_step(&mut self, step: &StepInvocation<'_>) -> StepOutcome;

    /// Clean up after `scenario`. Runs whatever the outcome of its steps.
    fn after_scenario(&mut self, _scenario: &CompiledScenario) -> StepOutcome {
        StepOutcome::Passed
    }
}

/// Error a step handler returns to mark its step as skipped.
///
/// # Examples
/// ```
/// use spark_bridge::{SkipStep, StepArgs};
///
/// fn needs_network(_world: &mut (), _args: &StepArgs) -> eyre::Result<()> {
///     Err(SkipStep::because("network disabled").into())
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkipStep {
    message: Option<String>,
}

impl SkipStep {
    /// Skip with an explanation.
    #[must_use]
    pub fn because(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The explanation, if one was given.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for SkipStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "step skipped: {message}"),
            None => f.write_str("step skipped"),
        }
    }
}

impl std::error::Error for SkipStep {}

/// Values captured from a matched step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepArgs {
    captures: Vec<String>,
    docstring: Option<String>,
    table: Option<Vec<Vec<String>>>,
}

impl StepArgs {
    /// Arguments with the given captures and no step attachments.
    #[must_use]
    pub fn new(captures: Vec<String>) -> Self {
        Self {
            captures,
            ..Self::default()
        }
    }

    /// Number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    /// Whether the pattern captured nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Captured parameter `index` as text.
    ///
    /// # Errors
    /// Fails if the pattern has no such parameter.
    pub fn str(&self, index: usize) -> eyre::Result<&str> {
        self.captures
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| eyre!("step has no parameter {index}"))
    }

    /// Captured parameter `index` as an integer.
    ///
    /// # Errors
    /// Fails if the parameter is missing or not an integer.
    pub fn int(&self, index: usize) -> eyre::Result<i64> {
        let raw = self.str(index)?;
        raw.parse()
            .map_err(|err| eyre!("parameter {index} ('{raw}') is not an integer: {err}"))
    }

    /// Captured parameter `index` as a float.
    ///
    /// # Errors
    /// Fails if the parameter is missing or not a number.
    pub fn float(&self, index: usize) -> eyre::Result<f64> {
        let raw = self.str(index)?;
        raw.parse()
            .map_err(|err| eyre!("parameter {index} ('{raw}') is not a number: {err}"))
    }

    /// The step's doc string.
    ///
    /// # Errors
    /// Fails if the step has none.
    pub fn docstring(&self) -> eyre::Result<&str> {
        self.docstring
            .as_deref()
            .ok_or_else(|| eyre!("step has no doc string"))
    }

    /// The step's data table rows.
    ///
    /// # Errors
    /// Fails if the step has none.
    pub fn table(&self) -> eyre::Result<&[Vec<String>]> {
        self.table
            .as_deref()
            .ok_or_else(|| eyre!("step has no data table"))
    }
}

/// Signature of a step handler.
pub type StepHandler<W> = fn(&mut W, &StepArgs) -> eyre::Result<()>;

struct StepDefinition<W> {
    keyword: &'static str,
    pattern: String,
    regex: Regex,
    handler: StepHandler<W>,
}

/// Step definitions keyed by Cucumber-style patterns.
///
/// Matching ignores the step keyword, so a `Given` definition also matches
/// an `And` or `Then` step with the same text. The world `W` is reset to
/// `W::default()` before every scenario.
///
/// # Examples
/// ```
/// use spark_bridge::{StepDefinitions, StepInvocation, StepOutcome, StepRegistry};
///
/// # fn main() -> Result<(), spark_bridge::RegistryError> {
/// let mut registry = StepRegistry::<i64>::new()
///     .given("a counter at {int}", |world, args| {
///         *world = args.int(0)?;
///         Ok(())
///     })?;
/// let step = StepInvocation {
///     keyword: "Given",
///     text: "a counter at 3",
///     docstring: None,
///     table: None,
/// };
/// assert_eq!(registry.run_step(&step), StepOutcome::Passed);
/// assert_eq!(*registry.world(), 3);
/// # Ok(())
/// # }
/// ```
pub struct StepRegistry<W> {
    definitions: Vec<StepDefinition<W>>,
    world: W,
}

impl<W: Default> Default for StepRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> fmt::Debug for StepRegistry<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns: Vec<_> = self
            .definitions
            .iter()
            .map(|d| format!("{} {}", d.keyword, d.pattern))
            .collect();
        f.debug_struct("StepRegistry")
            .field("definitions", &patterns)
            .finish_non_exhaustive()
    }
}

impl<W: Default> StepRegistry<W> {
    /// Registry with no definitions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
            world: W::default(),
        }
    }

    /// Register a `Given` definition.
    ///
    /// # Errors
    /// Fails if `pattern` is not a valid step pattern.
    pub fn given(self, pattern: &str, handler: StepHandler<W>) -> Result<Self, RegistryError> {
        self.register("Given", pattern, handler)
    }

    /// Register a `When` definition.
    ///
    /// # Errors
    /// Fails if `pattern` is not a valid step pattern.
    pub fn when(self, pattern: &str, handler: StepHandler<W>) -> Result<Self, RegistryError> {
        self.register("When", pattern, handler)
    }

    /// Register a `Then` definition.
    ///
    /// # Errors
    /// Fails if `pattern` is not a valid step pattern.
    pub fn then(self, pattern: &str, handler: StepHandler<W>) -> Result<Self, RegistryError> {
        self.register("Then", pattern, handler)
    }

    fn register(
        mut self,
        keyword: &'static str,
        pattern: &str,
        handler: StepHandler<W>,
    ) -> Result<Self, RegistryError> {
        let regex = pattern::compile(pattern)?;
        self.definitions.push(StepDefinition {
            keyword,
            pattern: pattern.to_owned(),
            regex,
            handler,
        });
        Ok(self)
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether no definitions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The current scenario's world.
    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    fn resolve(&self, step: &StepInvocation<'_>) -> Result<(StepHandler<W>, StepArgs), StepOutcome> {
        let mut matches = self
            .definitions
            .iter()
            .filter_map(|def| def.regex.captures(step.text).map(|caps| (def, caps)));
        let Some((definition, captures)) = matches.next() else {
            log::warn!("no step definition matches '{} {}'", step.keyword, step.text);
            return Err(StepOutcome::Undefined);
        };
        let others: Vec<&str> = matches.map(|(def, _)| def.pattern.as_str()).collect();
        if !others.is_empty() {
            return Err(StepOutcome::Failed(format!(
                "ambiguous step '{}': matches '{}' and '{}'",
                step.text,
                definition.pattern,
                others.join("', '")
            )));
        }
        let args = StepArgs {
            captures: captures
                .iter()
                .skip(1)
                .map(|m| m.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect(),
            docstring: step.docstring.map(str::to_owned),
            table: step.table.map(<[Vec<String>]>::to_vec),
        };
        Ok((definition.handler, args))
    }
}

impl<W: Default> StepDefinitions for StepRegistry<W> {
    fn before_scenario(&mut self, scenario: &CompiledScenario) -> StepOutcome {
        log::debug!("resetting world for scenario '{}'", scenario.name);
        self.world = W::default();
        StepOutcome::Passed
    }

    fn run_step(&mut self, step: &StepInvocation<'_>) -> StepOutcome {
        let (handler, args) = match self.resolve(step) {
            Ok(resolved) => resolved,
            Err(outcome) => return outcome,
        };
        let world = &mut self.world;
        catch_step_panic(|| match handler(world, &args) {
            Ok(()) => StepOutcome::Passed,
            Err(err) => match err.downcast_ref::<SkipStep>() {
                Some(skip) => StepOutcome::Skipped(skip.message.clone()),
                None => StepOutcome::Failed(format!("{err:#}")),
            },
        })
    }
}

/// Run `step`, turning a panic into [`StepOutcome::Failed`].
pub(crate) fn catch_step_panic(step: impl FnOnce() -> StepOutcome) -> StepOutcome {
    panic::catch_unwind(AssertUnwindSafe(step))
        .unwrap_or_else(|payload| StepOutcome::Failed(panic_message(payload.as_ref())))
}

/// Render a panic payload raised by a step handler.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "step panicked with a non-string payload".to_owned())
}

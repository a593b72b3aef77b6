//! Gherkin feature loading and scenario compilation.
//!
//! Compilation flattens a parsed [`Feature`] into the list of scenarios the
//! runner executes: background steps are prepended, rule scenarios are
//! included in declaration order, and every scenario outline is expanded
//! once per examples row.

use camino::Utf8Path;
use gherkin::{Background, Examples, Feature, GherkinEnv, Scenario, Step};

use crate::FeatureError;

/// A scenario ready to run, with background steps and placeholders resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledScenario {
    /// Display name; outline rows substitute their placeholders here too.
    pub name: String,
    /// Feature, rule, scenario and examples tags in that order.
    pub tags: Vec<String>,
    /// One-based line of the scenario in its feature file.
    pub line: usize,
    /// Steps in execution order.
    pub steps: Vec<CompiledStep>,
}

/// A step ready to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledStep {
    /// Keyword as written, without surrounding whitespace.
    pub keyword: String,
    /// Step text without the keyword.
    pub text: String,
    /// One-based line of the step in its feature file.
    pub line: usize,
    /// Attached doc string, if any.
    pub docstring: Option<String>,
    /// Attached data table rows, if any.
    pub table: Option<Vec<Vec<String>>>,
}

impl From<&Step> for CompiledStep {
    fn from(step: &Step) -> Self {
        Self {
            keyword: step.keyword.trim().to_owned(),
            text: step.value.clone(),
            line: step.position.line,
            docstring: step.docstring.clone(),
            table: step.table.as_ref().map(|table| table.rows.clone()),
        }
    }
}

/// Parse feature text.
///
/// A missing trailing newline is added before parsing.
///
/// # Errors
/// Returns [`FeatureError::Parse`] when the text is not valid Gherkin.
///
/// # Examples
/// ```
/// let feature = spark_bridge::parse_feature(
///     "Feature: Posts\n  Scenario: Get post\n    Given the API is available",
/// )
/// .unwrap();
/// assert_eq!(feature.scenarios.len(), 1);
/// ```
pub fn parse_feature(text: &str) -> Result<Feature, FeatureError> {
    let mut source = text.to_owned();
    normalise_trailing_newline(&mut source);
    Ok(Feature::parse(source, GherkinEnv::default())?)
}

/// Read and parse a feature file.
///
/// # Errors
/// Returns [`FeatureError::Read`] when the file cannot be read and
/// [`FeatureError::Parse`] when it is not valid Gherkin.
pub fn load_feature(path: impl AsRef<Utf8Path>) -> Result<Feature, FeatureError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| FeatureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded feature file {path}");
    parse_feature(&text)
}

/// Flatten `feature` into runnable scenarios.
#[must_use]
pub fn compile_scenarios(feature: &Feature) -> Vec<CompiledScenario> {
    let mut compiled = Vec::new();
    let feature_background = background_steps(feature.background.as_ref());
    for scenario in &feature.scenarios {
        compile_into(
            &mut compiled,
            scenario,
            &feature_background,
            &feature.tags,
        );
    }
    for rule in &feature.rules {
        let mut background = feature_background.clone();
        background.extend(background_steps(rule.background.as_ref()));
        let tags = merge_tags(&feature.tags, &rule.tags);
        for scenario in &rule.scenarios {
            compile_into(&mut compiled, scenario, &background, &tags);
        }
    }
    compiled
}

fn normalise_trailing_newline(text: &mut String) {
    if !text.ends_with('\n') {
        text.push('\n');
    }
}

fn background_steps(background: Option<&Background>) -> Vec<CompiledStep> {
    background
        .map(|bg| bg.steps.iter().map(CompiledStep::from).collect())
        .unwrap_or_default()
}

fn merge_tags(base: &[String], extra: &[String]) -> Vec<String> {
    let mut tags = base.to_vec();
    for tag in extra {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

fn compile_into(
    out: &mut Vec<CompiledScenario>,
    scenario: &Scenario,
    background: &[CompiledStep],
    inherited_tags: &[String],
) {
    let tags = merge_tags(inherited_tags, &scenario.tags);
    let mut steps = background.to_vec();
    steps.extend(scenario.steps.iter().map(CompiledStep::from));

    if scenario.examples.is_empty() {
        out.push(CompiledScenario {
            name: scenario.name.clone(),
            tags,
            line: scenario.position.line,
            steps,
        });
        return;
    }

    for examples in &scenario.examples {
        expand_examples(out, scenario, examples, &steps, &tags);
    }
}

fn expand_examples(
    out: &mut Vec<CompiledScenario>,
    scenario: &Scenario,
    examples: &Examples,
    steps: &[CompiledStep],
    tags: &[String],
) {
    let Some((headers, rows)) = examples
        .table
        .as_ref()
        .and_then(|table| table.rows.split_first())
    else {
        log::warn!("examples of '{}' have no table; skipping", scenario.name);
        return;
    };
    let tags = merge_tags(tags, &examples.tags);
    for row in rows {
        let values: Vec<(&str, &str)> = headers
            .iter()
            .map(String::as_str)
            .zip(row.iter().map(String::as_str))
            .collect();
        out.push(CompiledScenario {
            name: substitute(&scenario.name, &values),
            tags: tags.clone(),
            line: scenario.position.line,
            steps: steps
                .iter()
                .map(|step| substitute_step(step, &values))
                .collect(),
        });
    }
}

fn substitute_step(step: &CompiledStep, values: &[(&str, &str)]) -> CompiledStep {
    CompiledStep {
        keyword: step.keyword.clone(),
        text: substitute(&step.text, values),
        line: step.line,
        docstring: step.docstring.as_deref().map(|doc| substitute(doc, values)),
        table: step.table.as_ref().map(|rows| {
            rows.iter()
                .map(|row| row.iter().map(|cell| substitute(cell, values)).collect())
                .collect()
        }),
    }
}

/// Replace every `<header>` token with its row value. Unknown tokens stay.
fn substitute(text: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(text.to_owned(), |acc, (header, value)| {
        acc.replace(&format!("<{header}>"), value)
    })
}

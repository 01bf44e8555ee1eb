//! The validated, immutable registry of stages and their checks.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use super::{RegistryDefinition, StageDefinition};
use crate::actions::StageAction;
use crate::core::{Automation, Responsibility};
use crate::errors::{ConfigurationError, ConfigurationErrorKind};

/// A reference to a stage, either by key or by number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageRef {
    /// Ordinal stage number.
    Number(u32),
    /// Symbolic stage key.
    Key(String),
}

impl fmt::Display for StageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Key(key) => write!(f, "{key}"),
        }
    }
}

impl From<u32> for StageRef {
    fn from(number: u32) -> Self {
        Self::Number(number)
    }
}

impl From<&str> for StageRef {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for StageRef {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<&String> for StageRef {
    fn from(key: &String) -> Self {
        Self::Key(key.clone())
    }
}

/// A validated stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSpec {
    /// Ordinal position.
    pub number: u32,
    /// Symbolic key.
    pub key: String,
    /// Human-readable title.
    pub title: String,
    /// Input artifact description.
    pub input: Option<String>,
    /// Output artifact description.
    pub output: Option<String>,
    /// Ordered, non-empty, unique check names.
    pub checks: Vec<String>,
    /// Accountable party.
    pub responsibility: Responsibility,
    /// Automation mode.
    pub automation: Automation,
    /// Direct predecessors, by number.
    pub dependencies: Vec<u32>,
    /// External actions offered on the stage.
    pub actions: Vec<StageAction>,
}

impl StageSpec {
    /// Returns true if the stage has a check with this name.
    #[must_use]
    pub fn has_check(&self, check: &str) -> bool {
        self.checks.iter().any(|c| c == check)
    }

    /// Returns true if the action is configured on this stage.
    #[must_use]
    pub fn offers(&self, action: StageAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Static definition of which checks exist within each stage.
///
/// Construction validates the whole table, so every lookup afterwards works
/// on a registry where each stage has at least one check, identifiers are
/// unique and dependencies form an acyclic graph.
#[derive(Debug, Clone)]
pub struct CheckRegistry {
    /// Stages ordered by number.
    stages: Vec<StageSpec>,
    by_number: HashMap<u32, usize>,
    by_key: HashMap<String, usize>,
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::bcp()
    }
}

impl CheckRegistry {
    /// Validates a definition and builds the registry.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the definition is empty, a stage
    /// has no checks, an identifier is duplicated, a dependency is unknown or
    /// the dependencies contain a cycle.
    pub fn new(definition: RegistryDefinition) -> Result<Self, ConfigurationError> {
        validate(&definition)?;
        let registry = Self::index(definition);
        validate_acyclic(&registry.stages)?;
        Ok(registry)
    }

    /// The BCP pipeline registry.
    #[must_use]
    pub fn bcp() -> Self {
        // The built-in table is covered by `test_bcp_definition_is_valid`.
        Self::index(RegistryDefinition::bcp())
    }

    fn index(definition: RegistryDefinition) -> Self {
        let mut defs = definition.stages;
        defs.sort_by_key(|s| s.number);

        let mut previous: Option<u32> = None;
        let stages: Vec<StageSpec> = defs
            .into_iter()
            .map(|def| {
                let dependencies = def
                    .depends_on
                    .clone()
                    .unwrap_or_else(|| previous.into_iter().collect());
                previous = Some(def.number);
                StageSpec {
                    number: def.number,
                    key: def.key,
                    title: def.title,
                    input: def.input,
                    output: def.output,
                    checks: def.checks,
                    responsibility: def.responsibility,
                    automation: def.automation,
                    dependencies,
                    actions: def.actions,
                }
            })
            .collect();

        let by_number = stages.iter().enumerate().map(|(i, s)| (s.number, i)).collect();
        let by_key = stages.iter().enumerate().map(|(i, s)| (s.key.clone(), i)).collect();

        Self {
            stages,
            by_number,
            by_key,
        }
    }

    /// Returns all stages ordered by number.
    #[must_use]
    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the registry has no stages. Never true for a
    /// validated registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Looks up a stage by number.
    #[must_use]
    pub fn by_number(&self, number: u32) -> Option<&StageSpec> {
        self.by_number.get(&number).map(|&i| &self.stages[i])
    }

    /// Looks up a stage by key.
    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<&StageSpec> {
        self.by_key.get(key).map(|&i| &self.stages[i])
    }

    /// Resolves a stage reference.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownStage` error if nothing matches.
    pub fn stage(&self, stage: &StageRef) -> Result<&StageSpec, ConfigurationError> {
        match stage {
            StageRef::Number(n) => self.by_number(*n),
            StageRef::Key(key) => self.by_key(key),
        }
        .ok_or_else(|| ConfigurationError::unknown_stage(stage.to_string()))
    }

    /// Returns the ordered check names of a stage.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownStage` error if the stage is not registered.
    pub fn check_names(&self, stage: &StageRef) -> Result<&[String], ConfigurationError> {
        self.stage(stage).map(|s| s.checks.as_slice())
    }

    /// Returns true if `(stage_key, check)` names a registered check.
    #[must_use]
    pub fn contains(&self, stage_key: &str, check: &str) -> bool {
        self.by_key(stage_key).is_some_and(|s| s.has_check(check))
    }

    /// Returns the number of checks across all stages.
    #[must_use]
    pub fn total_checks(&self) -> usize {
        self.stages.iter().map(|s| s.checks.len()).sum()
    }
}

fn validate(definition: &RegistryDefinition) -> Result<(), ConfigurationError> {
    if definition.stages.is_empty() {
        return Err(ConfigurationError::new(
            ConfigurationErrorKind::EmptyStage,
            "Registry must define at least one stage",
        ));
    }

    let mut numbers = HashSet::new();
    let mut keys = HashSet::new();
    for stage in &definition.stages {
        validate_stage(stage)?;
        if !numbers.insert(stage.number) {
            return Err(duplicate(format!("Duplicate stage number {}", stage.number))
                .with_stage(stage.key.clone()));
        }
        if !keys.insert(stage.key.as_str()) {
            return Err(duplicate(format!("Duplicate stage key '{}'", stage.key))
                .with_stage(stage.key.clone()));
        }
    }

    for stage in &definition.stages {
        for dep in stage.depends_on.iter().flatten() {
            if *dep == stage.number {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::Cycle,
                    format!("Stage '{}' cannot depend on itself", stage.key),
                )
                .with_stage(stage.key.clone()));
            }
            if !numbers.contains(dep) {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::MissingDependency,
                    format!("Stage '{}' depends on unknown stage {dep}", stage.key),
                )
                .with_stage(stage.key.clone()));
            }
        }
    }

    Ok(())
}

fn validate_stage(stage: &StageDefinition) -> Result<(), ConfigurationError> {
    if stage.number == 0 {
        return Err(ConfigurationError::new(
            ConfigurationErrorKind::InvalidStage,
            format!("Stage '{}' must have a number of at least 1", stage.key),
        )
        .with_stage(stage.key.clone()));
    }
    if stage.key.trim().is_empty() {
        return Err(ConfigurationError::new(
            ConfigurationErrorKind::InvalidStage,
            format!("Stage {} must have a non-empty key", stage.number),
        ));
    }
    if stage.checks.is_empty() {
        return Err(ConfigurationError::new(
            ConfigurationErrorKind::EmptyStage,
            format!("Stage '{}' has no checks", stage.key),
        )
        .with_stage(stage.key.clone()));
    }

    let mut seen = HashSet::new();
    for check in &stage.checks {
        if !seen.insert(check.as_str()) {
            return Err(duplicate(format!(
                "Stage '{}' lists check '{check}' more than once",
                stage.key
            ))
            .with_stage(stage.key.clone())
            .with_check(check.clone()));
        }
    }

    Ok(())
}

fn duplicate(message: String) -> ConfigurationError {
    ConfigurationError::new(ConfigurationErrorKind::Duplicate, message)
}

/// Depth-first search over the dependency edges, reporting the first cycle.
fn validate_acyclic(stages: &[StageSpec]) -> Result<(), ConfigurationError> {
    fn dfs(
        node: u32,
        edges: &BTreeMap<u32, &[u32]>,
        visited: &mut HashSet<u32>,
        path: &mut Vec<u32>,
    ) -> Result<(), Vec<u32>> {
        if let Some(start) = path.iter().position(|n| *n == node) {
            let mut cycle = path[start..].to_vec();
            cycle.push(node);
            return Err(cycle);
        }
        if !visited.insert(node) {
            return Ok(());
        }

        path.push(node);
        for dep in edges.get(&node).copied().unwrap_or_default() {
            dfs(*dep, edges, visited, path)?;
        }
        path.pop();
        Ok(())
    }

    let edges: BTreeMap<u32, &[u32]> = stages
        .iter()
        .map(|s| (s.number, s.dependencies.as_slice()))
        .collect();
    let mut visited = HashSet::new();

    for node in edges.keys() {
        dfs(*node, &edges, &mut visited, &mut Vec::new()).map_err(|cycle| {
            let path: Vec<String> = cycle.iter().map(ToString::to_string).collect();
            ConfigurationError::new(
                ConfigurationErrorKind::Cycle,
                format!("Cycle detected between stages: {}", path.join(" -> ")),
            )
        })?;
    }

    Ok(())
}

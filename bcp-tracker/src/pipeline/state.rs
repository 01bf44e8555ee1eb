//! The mutable checklist store.

use std::collections::HashMap;

use crate::core::{OverallStatus, StageProgress};
use crate::errors::ConfigurationError;
use crate::registry::CheckRegistry;

/// Stage key → (check name → value).
///
/// The shape is fixed by the registry the state was built from: toggling
/// changes values, never which stages or checks exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    checks: HashMap<String, HashMap<String, bool>>,
}

impl PipelineState {
    /// Creates a state with every registered check set to false.
    #[must_use]
    pub fn new(registry: &CheckRegistry) -> Self {
        let checks = registry
            .stages()
            .iter()
            .map(|stage| {
                let values = stage.checks.iter().map(|c| (c.clone(), false)).collect();
                (stage.key.clone(), values)
            })
            .collect();

        Self { checks }
    }

    /// Flips one check and returns its new value.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage or check does not exist.
    /// Nothing is mutated in that case.
    pub fn toggle(&mut self, stage_key: &str, check: &str) -> Result<bool, ConfigurationError> {
        let stage = self
            .checks
            .get_mut(stage_key)
            .ok_or_else(|| ConfigurationError::unknown_stage(stage_key))?;
        let value = stage
            .get_mut(check)
            .ok_or_else(|| ConfigurationError::unknown_check(stage_key, check))?;

        *value = !*value;
        Ok(*value)
    }

    /// Returns the value of one check.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage or check does not exist.
    pub fn value(&self, stage_key: &str, check: &str) -> Result<bool, ConfigurationError> {
        self.stage_checks(stage_key)?
            .get(check)
            .copied()
            .ok_or_else(|| ConfigurationError::unknown_check(stage_key, check))
    }

    /// Returns all check values of one stage.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage does not exist.
    pub fn stage_checks(&self, stage_key: &str) -> Result<&HashMap<String, bool>, ConfigurationError> {
        self.checks
            .get(stage_key)
            .ok_or_else(|| ConfigurationError::unknown_stage(stage_key))
    }

    /// Computes the progress of one stage.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage does not exist.
    pub fn stage_progress(&self, stage_key: &str) -> Result<StageProgress, ConfigurationError> {
        self.stage_checks(stage_key)
            .map(|checks| StageProgress::from_values(checks.values().copied()))
    }

    /// Computes the overall status across every stage.
    #[must_use]
    pub fn overall(&self) -> OverallStatus {
        OverallStatus::from_values(self.checks.values().flat_map(|c| c.values().copied()))
    }

    /// Iterates over the stage keys held by the state.
    pub fn stage_keys(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigurationErrorKind;

    fn state() -> PipelineState {
        PipelineState::new(&CheckRegistry::bcp())
    }

    #[test]
    fn test_new_state_matches_registry_shape() {
        let registry = CheckRegistry::bcp();
        let state = PipelineState::new(&registry);

        assert_eq!(state.stage_keys().count(), registry.len());
        for stage in registry.stages() {
            let checks = state.stage_checks(&stage.key).unwrap();
            assert_eq!(checks.len(), stage.checks.len());
            assert!(checks.values().all(|v| !v));
        }
    }

    #[test]
    fn test_toggle_flips_exactly_one_value() {
        let mut state = state();
        let before = state.clone();

        assert!(state.toggle("stage4", "fastqManifest").unwrap());
        assert!(state.value("stage4", "fastqManifest").unwrap());

        let mut restored = state.clone();
        restored.toggle("stage4", "fastqManifest").unwrap();
        assert_eq!(restored, before);
        assert!(!state.value("stage4", "ultimaSequencingQC").unwrap());
    }

    #[test]
    fn test_double_toggle_restores() {
        let mut state = state();
        state.toggle("stage1", "spreadsheetCompleted").unwrap();
        let snapshot = state.clone();

        state.toggle("stage2", "psomagenOrderGenerated").unwrap();
        state.toggle("stage2", "psomagenOrderGenerated").unwrap();

        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_toggle_unknown_identifiers_fails_without_mutation() {
        let mut state = state();
        let before = state.clone();

        let err = state.toggle("stage8", "readCount").unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::UnknownStage);

        let err = state.toggle("stage4", "readCount").unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::UnknownCheck);

        assert_eq!(state, before);
    }

    #[test]
    fn test_stage_progress_and_overall() {
        let mut state = state();
        state.toggle("stage5", "readCount").unwrap();
        state.toggle("stage5", "readLength").unwrap();

        let progress = state.stage_progress("stage5").unwrap();
        assert_eq!((progress.passed, progress.total), (2, 3));

        let overall = state.overall();
        assert_eq!((overall.passed, overall.total), (2, 13));
        assert_eq!(overall.percentage, 15);
    }
}

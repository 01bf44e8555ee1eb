//! Error types for the tracker.
//!
//! The core operations only ever fail with [`ConfigurationError`]: every
//! computation is synchronous and in-memory over already validated data, so
//! the only way to fail is to reference a stage, check or action the
//! registry does not know about, or to load a registry definition that is
//! itself malformed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for tracker operations outside the pure core.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A stage, check or registry definition was invalid.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Metadata about a configuration error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContractErrorInfo {
    /// Error code (e.g., "CONFIG-002-UNKNOWN_CHECK").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ContractErrorInfo {
    /// Creates a new contract error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::Value::String(self.code.clone()));
        map.insert("summary".to_string(), serde_json::Value::String(self.summary.clone()));

        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::Value::String(hint.clone()));
        }
        if !self.context.is_empty() {
            let context_map: serde_json::Map<String, serde_json::Value> = self
                .context
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            map.insert("context".to_string(), serde_json::Value::Object(context_map));
        }

        map
    }
}

/// Which kind of configuration defect was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationErrorKind {
    /// A stage key or number that is not in the registry.
    UnknownStage,
    /// A check name that is not part of the referenced stage.
    UnknownCheck,
    /// A stage definition without any checks.
    EmptyStage,
    /// A duplicate stage number, stage key or check name.
    Duplicate,
    /// A dependency on a stage that does not exist.
    MissingDependency,
    /// A dependency cycle between stages.
    Cycle,
    /// An action that is not configured for the referenced stage.
    UnknownAction,
    /// A stage definition with a malformed number or key.
    InvalidStage,
}

impl ConfigurationErrorKind {
    /// Returns the stable error code for this kind.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnknownStage => "CONFIG-001-UNKNOWN_STAGE",
            Self::UnknownCheck => "CONFIG-002-UNKNOWN_CHECK",
            Self::EmptyStage => "CONFIG-003-EMPTY_STAGE",
            Self::Duplicate => "CONFIG-004-DUPLICATE",
            Self::MissingDependency => "CONFIG-005-MISSING_DEP",
            Self::Cycle => "CONFIG-006-CYCLE",
            Self::UnknownAction => "CONFIG-007-UNKNOWN_ACTION",
            Self::InvalidStage => "CONFIG-008-INVALID_STAGE",
        }
    }
}

/// Raised when a stage/check identifier does not exist in the registry, or
/// when a registry definition violates the registry invariants.
///
/// This is a wiring defect, not a user error: a correctly wired
/// presentation layer never triggers it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ConfigurationError {
    /// The kind of defect.
    pub kind: ConfigurationErrorKind,
    /// The error message.
    pub message: String,
    /// The stage involved, if any.
    pub stage: Option<String>,
    /// The check involved, if any.
    pub check: Option<String>,
    /// Structured diagnostic info.
    pub error_info: ContractErrorInfo,
}

impl ConfigurationError {
    /// Creates a new configuration error of the given kind.
    #[must_use]
    pub fn new(kind: ConfigurationErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut error_info = ContractErrorInfo::new(kind.code(), message.clone());
        if let Some(hint) = ConfigurationSuggestions::get(kind.code()) {
            error_info = error_info.with_fix_hint(hint);
        }
        Self {
            kind,
            message,
            stage: None,
            check: None,
            error_info,
        }
    }

    /// Sets the stage involved.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        let stage = stage.into();
        self.error_info = self.error_info.with_context_entry("stage", stage.clone());
        self.stage = Some(stage);
        self
    }

    /// Sets the check involved.
    #[must_use]
    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        let check = check.into();
        self.error_info = self.error_info.with_context_entry("check", check.clone());
        self.check = Some(check);
        self
    }

    /// An unknown stage reference.
    #[must_use]
    pub fn unknown_stage(stage: impl Into<String>) -> Self {
        let stage = stage.into();
        Self::new(
            ConfigurationErrorKind::UnknownStage,
            format!("Unknown stage '{stage}'"),
        )
        .with_stage(stage)
    }

    /// An unknown check within a known stage.
    #[must_use]
    pub fn unknown_check(stage: impl Into<String>, check: impl Into<String>) -> Self {
        let stage = stage.into();
        let check = check.into();
        Self::new(
            ConfigurationErrorKind::UnknownCheck,
            format!("Stage '{stage}' has no check named '{check}'"),
        )
        .with_stage(stage)
        .with_check(check)
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("message".to_string(), serde_json::json!(self.message));
        map.insert("kind".to_string(), serde_json::json!(self.kind));
        if let Some(ref stage) = self.stage {
            map.insert("stage".to_string(), serde_json::json!(stage));
        }
        if let Some(ref check) = self.check {
            map.insert("check".to_string(), serde_json::json!(check));
        }
        let info_map: serde_json::Map<String, serde_json::Value> =
            self.error_info.to_dict().into_iter().collect();
        map.insert("error_info".to_string(), serde_json::Value::Object(info_map));
        map
    }

    /// The [`to_dict`](Self::to_dict) map as a JSON object, as handed to the
    /// Python bindings.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.to_dict().into_iter().collect())
    }
}

/// Provides default suggestions for configuration error codes.
pub struct ConfigurationSuggestions;

impl ConfigurationSuggestions {
    /// Gets a suggestion for a given error code.
    #[must_use]
    pub fn get(code: &str) -> Option<&'static str> {
        match code {
            "CONFIG-001-UNKNOWN_STAGE" => Some(
                "Reference stages by a key or number taken from the registry. \
                 Check for typos in the stage key.",
            ),
            "CONFIG-002-UNKNOWN_CHECK" => Some(
                "Use check names from `check_names(stage)`; check names are \
                 scoped to exactly one stage.",
            ),
            "CONFIG-003-EMPTY_STAGE" => Some(
                "Give every stage at least one check so its percentage is defined.",
            ),
            "CONFIG-004-DUPLICATE" => Some(
                "Stage numbers, stage keys and check names within a stage must be unique.",
            ),
            "CONFIG-005-MISSING_DEP" => Some(
                "Ensure every dependency references a stage number defined in the registry.",
            ),
            "CONFIG-006-CYCLE" => Some(
                "Remove one of the dependencies in the cycle. \
                 Use a linear chain of stages instead.",
            ),
            "CONFIG-007-UNKNOWN_ACTION" => Some(
                "Only invoke actions listed for the stage in the registry.",
            ),
            "CONFIG-008-INVALID_STAGE" => Some(
                "Number stages from 1 and give every stage a non-empty key.",
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_error_info_creation() {
        let info = ContractErrorInfo::new("TEST-001", "Test error")
            .with_fix_hint("Fix this by doing that")
            .with_context_entry("stage", "stage1");

        assert_eq!(info.code, "TEST-001");
        assert_eq!(info.summary, "Test error");
        assert_eq!(info.fix_hint, Some("Fix this by doing that".to_string()));
        assert_eq!(info.context.get("stage"), Some(&"stage1".to_string()));
    }

    #[test]
    fn test_unknown_check_carries_identifiers() {
        let err = ConfigurationError::unknown_check("stage4", "fastqManifests");

        assert_eq!(err.kind, ConfigurationErrorKind::UnknownCheck);
        assert_eq!(err.stage.as_deref(), Some("stage4"));
        assert_eq!(err.check.as_deref(), Some("fastqManifests"));
        assert_eq!(err.error_info.code, "CONFIG-002-UNKNOWN_CHECK");
        assert!(err.error_info.fix_hint.is_some());
        assert!(err.to_string().contains("fastqManifests"));
    }

    #[test]
    fn test_configuration_error_to_dict() {
        let dict = ConfigurationError::unknown_stage("stage9").to_dict();

        assert_eq!(dict.get("kind").unwrap(), "unknown_stage");
        assert_eq!(dict.get("stage").unwrap(), "stage9");
        assert!(dict.get("check").is_none());
        assert_eq!(
            dict["error_info"]["context"]["stage"],
            serde_json::json!("stage9")
        );
    }

    #[test]
    fn test_configuration_error_to_value() {
        let value = ConfigurationError::unknown_check("stage5", "fastqManifest").to_value();

        assert_eq!(value["kind"], "unknown_check");
        assert_eq!(value["check"], "fastqManifest");
        assert_eq!(value["error_info"]["code"], "CONFIG-002-UNKNOWN_CHECK");
        assert!(value["error_info"]["fix_hint"].is_string());
        assert_eq!(value["message"], "Stage 'stage5' has no check named 'fastqManifest'");
    }

    #[test]
    fn test_tracker_error_from_configuration() {
        let err: TrackerError = ConfigurationError::unknown_stage("nope").into();
        assert!(matches!(err, TrackerError::Configuration(_)));
        assert_eq!(err.to_string(), "Unknown stage 'nope'");
    }

    #[test]
    fn test_every_kind_has_a_suggestion() {
        for kind in [
            ConfigurationErrorKind::UnknownStage,
            ConfigurationErrorKind::UnknownCheck,
            ConfigurationErrorKind::EmptyStage,
            ConfigurationErrorKind::Duplicate,
            ConfigurationErrorKind::MissingDependency,
            ConfigurationErrorKind::Cycle,
            ConfigurationErrorKind::UnknownAction,
            ConfigurationErrorKind::InvalidStage,
        ] {
            assert!(ConfigurationSuggestions::get(kind.code()).is_some(), "{kind:?}");
        }
        assert!(ConfigurationSuggestions::get("UNKNOWN").is_none());
    }
}

//! Tracker configuration.

use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_ENV: &str = "BCP_TRACKER_LOG";
/// Environment variable switching log output to JSON (`1`/`true`).
pub const LOG_JSON_ENV: &str = "BCP_TRACKER_LOG_JSON";

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or
    /// `bcp_tracker=debug`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Whether to emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Creates a logging configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads overrides from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = lookup(LOG_FILTER_ENV).filter(|v| !v.trim().is_empty()) {
            config.level = level;
        }
        if let Some(json) = lookup(LOG_JSON_ENV) {
            config.json = matches!(json.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        config
    }

    /// Sets the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Enables or disables JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Top-level tracker configuration.
///
/// None of these values feed the progress or blocking derivations; they are
/// carried for the presentation layer and for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Heading of the whole dashboard.
    #[serde(default = "default_dashboard_title")]
    pub dashboard_title: String,
    /// Name of the project whose pipeline is tracked.
    #[serde(default = "default_project_title")]
    pub project_title: String,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_dashboard_title() -> String {
    "BCP Data Generation & Deposition".to_string()
}

fn default_project_title() -> String {
    "Perturb-seq of resting CD4+ T Cells".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            dashboard_title: default_dashboard_title(),
            project_title: default_project_title(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with logging overrides taken from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            logging: LoggingConfig::from_env(),
            ..Self::default()
        }
    }

    /// Sets the project title.
    #[must_use]
    pub fn with_project_title(mut self, title: impl Into<String>) -> Self {
        self.project_title = title.into();
        self
    }

    /// Sets the dashboard title.
    #[must_use]
    pub fn with_dashboard_title(mut self, title: impl Into<String>) -> Self {
        self.dashboard_title = title.into();
        self
    }

    /// Sets the logging configuration.
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.dashboard_title, "BCP Data Generation & Deposition");
        assert_eq!(config.project_title, "Perturb-seq of resting CD4+ T Cells");
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_logging_from_lookup() {
        let config = LoggingConfig::from_lookup(lookup(&[
            (LOG_FILTER_ENV, "bcp_tracker=debug"),
            (LOG_JSON_ENV, "TRUE"),
        ]));
        assert_eq!(config.level, "bcp_tracker=debug");
        assert!(config.json);

        let config = LoggingConfig::from_lookup(lookup(&[(LOG_FILTER_ENV, "  "), (LOG_JSON_ENV, "0")]));
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"project_title": "Pilot run", "logging": {"json": true}}"#).unwrap();

        assert_eq!(config.project_title, "Pilot run");
        assert_eq!(config.dashboard_title, "BCP Data Generation & Deposition");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.json);
    }

    #[test]
    fn test_builders() {
        let config = TrackerConfig::new()
            .with_project_title("P")
            .with_dashboard_title("D")
            .with_logging(LoggingConfig::new().with_level("warn").with_json(true));

        assert_eq!(config.project_title, "P");
        assert_eq!(config.dashboard_title, "D");
        assert_eq!(config.logging.level, "warn");
    }
}

//! Serializable stage definitions and the built-in BCP table.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::actions::StageAction;
use crate::core::{Automation, Responsibility};
use crate::errors::TrackerError;

/// Definition of a single stage, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDefinition {
    /// Ordinal position in the pipeline, starting at 1.
    pub number: u32,
    /// Symbolic key, e.g. `stage4`.
    pub key: String,
    /// Human-readable title.
    pub title: String,
    /// Description of the artifact the stage consumes.
    #[serde(default)]
    pub input: Option<String>,
    /// Description of the artifact the stage produces.
    #[serde(default)]
    pub output: Option<String>,
    /// Ordered check names.
    pub checks: Vec<String>,
    /// Accountable party.
    #[serde(default)]
    pub responsibility: Responsibility,
    /// Automation mode.
    #[serde(default)]
    pub automation: Automation,
    /// Stage numbers this stage waits on. `None` means the stage with the
    /// next-lower number, which yields a linear chain.
    #[serde(default)]
    pub depends_on: Option<Vec<u32>>,
    /// External actions offered on the stage.
    #[serde(default)]
    pub actions: Vec<StageAction>,
}

impl StageDefinition {
    /// Creates a definition with no artifacts, no actions and the default
    /// classification.
    #[must_use]
    pub fn new(
        number: u32,
        key: impl Into<String>,
        title: impl Into<String>,
        checks: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            number,
            key: key.into(),
            title: title.into(),
            input: None,
            output: None,
            checks: checks.into_iter().map(Into::into).collect(),
            responsibility: Responsibility::default(),
            automation: Automation::default(),
            depends_on: None,
            actions: Vec::new(),
        }
    }

    /// Sets the input artifact description.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Sets the output artifact description.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Sets the responsible party.
    #[must_use]
    pub fn with_responsibility(mut self, responsibility: Responsibility) -> Self {
        self.responsibility = responsibility;
        self
    }

    /// Sets the automation mode.
    #[must_use]
    pub fn with_automation(mut self, automation: Automation) -> Self {
        self.automation = automation;
        self
    }

    /// Sets explicit dependencies.
    #[must_use]
    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = u32>) -> Self {
        self.depends_on = Some(deps.into_iter().collect());
        self
    }

    /// Adds an action.
    #[must_use]
    pub fn with_action(mut self, action: StageAction) -> Self {
        self.actions.push(action);
        self
    }
}

/// The complete static configuration of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDefinition {
    /// Stage definitions, in any order.
    pub stages: Vec<StageDefinition>,
}

impl RegistryDefinition {
    /// Creates a definition from stages.
    #[must_use]
    pub fn new(stages: Vec<StageDefinition>) -> Self {
        Self { stages }
    }

    /// Parses a definition from JSON.
    ///
    /// The result is not validated yet; pass it to
    /// [`super::CheckRegistry::new`].
    pub fn from_json_str(json: &str) -> Result<Self, TrackerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON definition file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// The BCP data generation and deposition pipeline.
    #[must_use]
    pub fn bcp() -> Self {
        Self::new(vec![
            StageDefinition::new(
                1,
                "stage1",
                "Library Generation & Metadata",
                ["spreadsheetCompleted", "spreadsheetValidated"],
            )
            .with_input("Lattice Metadata Spreadsheet Template")
            .with_output("Filled and Validated Metadata Spreadsheet")
            .with_action(StageAction::DownloadTemplate)
            .with_action(StageAction::SubmitMetadata),
            StageDefinition::new(2, "stage2", "NGS Order Generation", ["psomagenOrderGenerated"])
                .with_input("Filled and Validated Metadata Spreadsheet")
                .with_output("Filled Psomagen Order Form")
                .with_automation(Automation::Automatic)
                .with_action(StageAction::DownloadDocument),
            StageDefinition::new(3, "stage3", "Sample Shipping", ["shipSampleLibraries"])
                .with_input("Psomagen Order Form"),
            StageDefinition::new(
                4,
                "stage4",
                "Partner Sequencing",
                ["ultimaSequencingQC", "fastqFilesDeposited", "fastqManifest"],
            )
            .with_output("File manifest for all uploaded files with md5sums")
            .with_responsibility(Responsibility::Partner)
            .with_action(StageAction::AccessBucket),
            StageDefinition::new(
                5,
                "stage5",
                "FASTQ Validation",
                ["readCount", "readLength", "md5sumComparisons"],
            )
            .with_input("FASTQ Manifest")
            .with_responsibility(Responsibility::Coordinator)
            .with_automation(Automation::Automatic),
            StageDefinition::new(
                6,
                "stage6",
                "CellRanger Processing",
                ["cellrangerQC", "provenanceCheck"],
            )
            .with_responsibility(Responsibility::Partner)
            .with_automation(Automation::Automatic)
            .with_action(StageAction::AccessBucket),
            StageDefinition::new(7, "stage7", "Curated H5AD Generation", ["curatedH5adGeneration"])
                .with_responsibility(Responsibility::Curator)
                .with_action(StageAction::AccessBucket),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_bcp_table_shape() {
        let def = RegistryDefinition::bcp();
        let counts: Vec<usize> = def.stages.iter().map(|s| s.checks.len()).collect();

        assert_eq!(counts, vec![2, 1, 1, 3, 3, 2, 1]);
        assert_eq!(counts.iter().sum::<usize>(), 13);
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let def = RegistryDefinition::from_json_str(
            r#"{"stages": [
                {"number": 1, "key": "prep", "title": "Prep", "checks": ["done"]},
                {"number": 2, "key": "seq", "title": "Sequence", "checks": ["run"],
                 "responsibility": "partner", "automation": "automatic",
                 "actions": ["access_bucket"]}
            ]}"#,
        )
        .unwrap();

        let prep = &def.stages[0];
        assert_eq!(prep.responsibility, Responsibility::Lab);
        assert_eq!(prep.automation, Automation::Manual);
        assert_eq!(prep.depends_on, None);
        assert!(prep.actions.is_empty());

        let seq = &def.stages[1];
        assert_eq!(seq.responsibility, Responsibility::Partner);
        assert_eq!(seq.actions, vec![StageAction::AccessBucket]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = RegistryDefinition::from_json_str("{\"stages\": 3}").unwrap_err();
        assert!(matches!(err, TrackerError::Serialization(_)));
    }

    #[test]
    fn test_round_trip_through_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&RegistryDefinition::bcp()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = RegistryDefinition::from_path(file.path()).unwrap();
        assert_eq!(loaded, RegistryDefinition::bcp());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RegistryDefinition::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, TrackerError::Io(_)));
    }
}

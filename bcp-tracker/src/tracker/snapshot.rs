//! Serializable dashboard view.

use serde::{Deserialize, Serialize};

use super::PipelineTracker;
use crate::actions::StageAction;
use crate::core::{
    Automation, OverallHealth, OverallStatus, Responsibility, StageProgress, StageStatus,
};
use crate::registry::StageSpec;
use crate::utils::{check_label, iso_timestamp};

/// One check as the presentation layer renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSnapshot {
    /// Check name.
    pub name: String,
    /// Humanized label.
    pub label: String,
    /// Current value.
    pub value: bool,
}

/// One action with its current availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSnapshot {
    /// The action.
    pub action: StageAction,
    /// Whether it can be invoked now.
    pub available: bool,
}

/// Everything derived for one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSnapshot {
    /// Stage number.
    pub number: u32,
    /// Stage key.
    pub key: String,
    /// Stage title.
    pub title: String,
    /// Input artifact description.
    pub input: Option<String>,
    /// Output artifact description.
    pub output: Option<String>,
    /// Accountable party.
    pub responsibility: Responsibility,
    /// Automation mode.
    pub automation: Automation,
    /// Progress over the stage's checks.
    pub progress: StageProgress,
    /// Derived status.
    pub status: StageStatus,
    /// Whether a direct predecessor is incomplete.
    pub blocked: bool,
    /// Checks in registry order.
    pub checks: Vec<CheckSnapshot>,
    /// Configured actions.
    pub actions: Vec<ActionSnapshot>,
}

/// The whole dashboard, recomputed from the tracker state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Tracker session.
    pub session_id: String,
    /// When the snapshot was built (ISO 8601).
    pub generated_at: String,
    /// Dashboard heading.
    pub dashboard_title: String,
    /// Tracked project.
    pub project_title: String,
    /// Overall status.
    pub overall: OverallStatus,
    /// Overall health indicator.
    pub health: OverallHealth,
    /// Stages ordered by number.
    pub stages: Vec<StageSnapshot>,
}

impl DashboardSnapshot {
    pub(super) fn build(tracker: &PipelineTracker) -> Self {
        let overall = tracker.overall_status();
        let stages = tracker
            .registry()
            .stages()
            .iter()
            .map(|spec| stage_snapshot(tracker, spec))
            .collect();

        Self {
            session_id: tracker.session_id().to_string(),
            generated_at: iso_timestamp(),
            dashboard_title: tracker.config().dashboard_title.clone(),
            project_title: tracker.config().project_title.clone(),
            overall,
            health: OverallHealth::from_status(&overall),
            stages,
        }
    }

    /// Looks up a stage by key.
    #[must_use]
    pub fn stage(&self, key: &str) -> Option<&StageSnapshot> {
        self.stages.iter().find(|s| s.key == key)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn stage_snapshot(tracker: &PipelineTracker, spec: &StageSpec) -> StageSnapshot {
    let state = tracker.state();
    let checks: Vec<CheckSnapshot> = spec
        .checks
        .iter()
        .map(|name| CheckSnapshot {
            name: name.clone(),
            label: check_label(name),
            value: state.value(&spec.key, name).unwrap_or(false),
        })
        .collect();

    let progress = StageProgress::from_values(checks.iter().map(|c| c.value));
    let blocked = tracker.is_stage_blocked(spec.number);

    StageSnapshot {
        number: spec.number,
        key: spec.key.clone(),
        title: spec.title.clone(),
        input: spec.input.clone(),
        output: spec.output.clone(),
        responsibility: spec.responsibility,
        automation: spec.automation,
        progress,
        status: StageStatus::derive(blocked, &progress),
        blocked,
        checks,
        actions: spec
            .actions
            .iter()
            .map(|&action| ActionSnapshot {
                action,
                available: action.is_available(blocked, &progress),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fresh_snapshot() {
        let snapshot = PipelineTracker::bcp().snapshot();

        assert_eq!(snapshot.stages.len(), 7);
        assert_eq!(snapshot.overall.total, 13);
        assert_eq!(snapshot.health, OverallHealth::Pending);
        assert_eq!(snapshot.project_title, "Perturb-seq of resting CD4+ T Cells");

        let first = snapshot.stage("stage1").unwrap();
        assert_eq!(first.status, StageStatus::Pending);
        assert!(!first.blocked);
        assert_eq!(
            first.checks.iter().map(|c| c.label.as_str()).collect::<Vec<_>>(),
            vec!["Spreadsheet Completed", "Spreadsheet Validated"]
        );
        assert!(first.actions.iter().all(|a| a.available));

        for stage in &snapshot.stages[1..] {
            assert_eq!(stage.status, StageStatus::Blocked, "{}", stage.key);
        }
    }

    #[test]
    fn test_snapshot_follows_toggles() {
        let mut tracker = PipelineTracker::bcp();
        tracker.toggle("stage1", "spreadsheetCompleted").unwrap();
        tracker.toggle("stage1", "spreadsheetValidated").unwrap();

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.stage("stage1").unwrap().status, StageStatus::Complete);

        let second = snapshot.stage("stage2").unwrap();
        assert_eq!(second.status, StageStatus::Pending);
        assert_eq!(
            second.actions,
            vec![ActionSnapshot {
                action: StageAction::DownloadDocument,
                available: false,
            }]
        );
        assert_eq!(snapshot.overall.passed, 2);
    }

    #[test]
    fn test_snapshot_json() {
        let json = PipelineTracker::bcp().snapshot().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["stages"][3]["key"], "stage4");
        assert_eq!(value["stages"][3]["responsibility"], "partner");
        assert_eq!(value["stages"][3]["status"], "blocked");
        assert_eq!(value["stages"][3]["actions"][0]["action"], "access_bucket");
        assert_eq!(value["overall"]["percentage"], 0);
    }
}

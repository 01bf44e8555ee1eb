//! Test assertions for tracker state.

use crate::core::StageStatus;
use crate::registry::StageRef;
use crate::tracker::PipelineTracker;

/// Asserts that a stage is blocked.
pub fn assert_stage_blocked(tracker: &PipelineTracker, stage_number: u32) {
    assert!(
        tracker.is_stage_blocked(stage_number),
        "Expected stage {stage_number} to be blocked"
    );
}

/// Asserts that a stage is not blocked.
pub fn assert_stage_open(tracker: &PipelineTracker, stage_number: u32) {
    assert!(
        !tracker.is_stage_blocked(stage_number),
        "Expected stage {stage_number} to be open"
    );
}

/// Asserts a stage's unrounded percentage within 1e-9.
pub fn assert_stage_percentage(tracker: &PipelineTracker, stage: impl Into<StageRef>, expected: f64) {
    let stage = stage.into();
    let actual = match tracker.stage_progress(stage.clone()) {
        Ok(progress) => progress.percentage,
        Err(err) => panic!("Expected progress for stage {stage}, got error: {err}"),
    };
    assert!(
        (actual - expected).abs() < 1e-9,
        "Expected stage {stage} at {expected}%, got {actual}%"
    );
}

/// Asserts the derived status of a stage.
pub fn assert_stage_status(tracker: &PipelineTracker, stage: impl Into<StageRef>, expected: StageStatus) {
    let stage = stage.into();
    match tracker.stage_status(stage.clone()) {
        Ok(actual) => assert_eq!(
            actual, expected,
            "Expected stage {stage} to be {expected}, got {actual}"
        ),
        Err(err) => panic!("Expected status for stage {stage}, got error: {err}"),
    }
}

/// Asserts the overall passed count and rounded percentage.
pub fn assert_overall(tracker: &PipelineTracker, passed: usize, percentage: u32) {
    let overall = tracker.overall_status();
    assert_eq!(
        (overall.passed, overall.percentage),
        (passed, percentage),
        "Unexpected overall status {overall:?}"
    );
}

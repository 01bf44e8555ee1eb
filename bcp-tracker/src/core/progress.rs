//! Per-stage and overall progress calculation.

use serde::{Deserialize, Serialize};

/// Passed/total counts for one stage, with an unrounded percentage.
///
/// The percentage stays a raw `f64` so that gating can compare it against
/// exactly `100.0`. Display code rounds on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageProgress {
    /// Number of checks that are true.
    pub passed: usize,
    /// Number of checks in the stage.
    pub total: usize,
    /// `passed / total * 100`, unrounded.
    pub percentage: f64,
}

impl StageProgress {
    /// Computes progress over a stage's check values.
    ///
    /// Stages are guaranteed non-empty by the registry, so `total` is never
    /// zero for a configured stage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let (passed, total) = values
            .into_iter()
            .fold((0, 0), |(passed, total), value| (passed + usize::from(value), total + 1));
        debug_assert!(total > 0, "progress requested for a stage without checks");

        Self {
            passed,
            total,
            percentage: passed as f64 / total as f64 * 100.0,
        }
    }

    /// Returns true if every check passed, using an exact comparison.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_complete(&self) -> bool {
        self.percentage == 100.0
    }

    /// Returns true if at least one check passed.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.percentage > 0.0
    }

    /// Percentage rounded to a whole number, for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn display_percentage(&self) -> u32 {
        self.percentage.round() as u32
    }
}

/// Passed/total counts across every check of every stage.
///
/// Unlike [`StageProgress`], the percentage is rounded to the nearest whole
/// percent because it only ever feeds display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallStatus {
    /// Number of checks that are true across all stages.
    pub passed: usize,
    /// Number of checks across all stages.
    pub total: usize,
    /// `passed / total * 100`, rounded half away from zero.
    pub percentage: u32,
}

impl OverallStatus {
    /// Computes the overall status over every check value in the pipeline.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let (passed, total) = values
            .into_iter()
            .fold((0, 0), |(passed, total), value| (passed + usize::from(value), total + 1));
        let percentage = if total == 0 {
            0
        } else {
            (passed as f64 / total as f64 * 100.0).round() as u32
        };

        Self {
            passed,
            total,
            percentage,
        }
    }

    /// Returns true if every check in the pipeline passed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }
}

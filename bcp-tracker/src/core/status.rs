//! Stage classification tags and derived status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{OverallStatus, StageProgress};

/// The party accountable for a stage's checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Responsibility {
    /// The wet lab preparing libraries and metadata.
    Lab,
    /// The sequencing partner.
    Partner,
    /// The data-coordination organisation.
    Coordinator,
    /// The curation organisation.
    Curator,
}

impl Default for Responsibility {
    fn default() -> Self {
        Self::Lab
    }
}

impl fmt::Display for Responsibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lab => write!(f, "lab"),
            Self::Partner => write!(f, "partner"),
            Self::Coordinator => write!(f, "coordinator"),
            Self::Curator => write!(f, "curator"),
        }
    }
}

/// Whether a stage's checks are satisfied by automated processing or by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Automation {
    /// Checks are ticked off by a person.
    Manual,
    /// Checks are expected to be satisfied by automated processing.
    Automatic,
}

impl Default for Automation {
    fn default() -> Self {
        Self::Manual
    }
}

impl fmt::Display for Automation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Automatic => write!(f, "automatic"),
        }
    }
}

/// The derived status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// No check passed yet.
    Pending,
    /// Some but not all checks passed.
    Active,
    /// Every check passed.
    Complete,
    /// A direct predecessor is not complete.
    Blocked,
}

impl Default for StageStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Complete => write!(f, "complete"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

impl StageStatus {
    /// Derives the status from the blocked flag and the stage's own progress.
    ///
    /// Blocked wins over everything else, so a stage whose checks were all
    /// ticked while its predecessor is incomplete still reports `Blocked`.
    #[must_use]
    pub fn derive(blocked: bool, progress: &StageProgress) -> Self {
        if blocked {
            Self::Blocked
        } else if progress.is_complete() {
            Self::Complete
        } else if progress.is_started() {
            Self::Active
        } else {
            Self::Pending
        }
    }

    /// Returns true if the stage may be worked on.
    #[must_use]
    pub fn is_workable(&self) -> bool {
        !matches!(self, Self::Blocked)
    }
}

/// Health indicator for the whole pipeline, derived from the rounded overall
/// percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallHealth {
    /// At most half of all checks passed.
    Pending,
    /// More than half of all checks passed.
    Active,
    /// Every check passed.
    Complete,
}

impl OverallHealth {
    /// Classifies the overall status.
    ///
    /// `Complete` requires every check to have passed; a rounded 100% with
    /// checks outstanding is only `Active`.
    #[must_use]
    pub fn from_status(overall: &OverallStatus) -> Self {
        if overall.is_complete() {
            Self::Complete
        } else if overall.percentage > 50 {
            Self::Active
        } else {
            Self::Pending
        }
    }
}

impl fmt::Display for OverallHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responsibility_display() {
        assert_eq!(Responsibility::Lab.to_string(), "lab");
        assert_eq!(Responsibility::Partner.to_string(), "partner");
        assert_eq!(Responsibility::Coordinator.to_string(), "coordinator");
        assert_eq!(Responsibility::Curator.to_string(), "curator");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Responsibility::default(), Responsibility::Lab);
        assert_eq!(Automation::default(), Automation::Manual);
        assert_eq!(StageStatus::default(), StageStatus::Pending);
    }

    #[test]
    fn test_stage_status_derive() {
        let none = StageProgress::from_values([false, false]);
        let some = StageProgress::from_values([true, false]);
        let all = StageProgress::from_values([true, true]);

        assert_eq!(StageStatus::derive(false, &none), StageStatus::Pending);
        assert_eq!(StageStatus::derive(false, &some), StageStatus::Active);
        assert_eq!(StageStatus::derive(false, &all), StageStatus::Complete);
        assert_eq!(StageStatus::derive(true, &all), StageStatus::Blocked);
        assert!(!StageStatus::Blocked.is_workable());
    }

    #[test]
    fn test_overall_health_thresholds() {
        let health = |passed: usize, total: usize| {
            OverallHealth::from_status(&OverallStatus::from_values(
                (0..total).map(|i| i < passed),
            ))
        };

        assert_eq!(health(0, 13), OverallHealth::Pending);
        assert_eq!(health(1, 2), OverallHealth::Pending);
        assert_eq!(health(7, 13), OverallHealth::Active);
        assert_eq!(health(12, 13), OverallHealth::Active);
        assert_eq!(health(13, 13), OverallHealth::Complete);
    }

    #[test]
    fn test_rounded_hundred_is_not_complete() {
        let overall = OverallStatus::from_values((0..200).map(|i| i < 199));

        assert_eq!(overall.percentage, 100);
        assert!(!overall.is_complete());
        assert_eq!(OverallHealth::from_status(&overall), OverallHealth::Active);
    }

    #[test]
    fn test_empty_overall_is_pending() {
        let overall = OverallStatus::from_values(std::iter::empty());
        assert_eq!(OverallHealth::from_status(&overall), OverallHealth::Pending);
    }

    #[test]
    fn test_tags_serialize() {
        let json = serde_json::to_string(&Automation::Automatic).unwrap();
        assert_eq!(json, r#""automatic""#);

        let status: StageStatus = serde_json::from_str(r#""blocked""#).unwrap();
        assert_eq!(status, StageStatus::Blocked);
    }
}

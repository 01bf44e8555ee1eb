//! Side-effecting stage actions (downloads, submissions, bucket access).
//!
//! The tracker never performs these itself. It decides whether an action is
//! available for a stage and hands an [`ActionRequest`] to an injected
//! [`ActionPort`]; the hosting application supplies the real implementation.

mod port;

pub use port::{ActionPort, LoggingActionPort, NoOpActionPort, RecordingActionPort};

#[cfg(test)]
pub use port::MockActionPort;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::StageProgress;

/// An external action attached to a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageAction {
    /// Download the blank metadata template.
    DownloadTemplate,
    /// Download the document produced by the stage.
    DownloadDocument,
    /// Submit the filled metadata.
    SubmitMetadata,
    /// Submit a stage document.
    SubmitDocument,
    /// Open the storage bucket holding the stage's files.
    AccessBucket,
}

impl fmt::Display for StageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DownloadTemplate => write!(f, "download_template"),
            Self::DownloadDocument => write!(f, "download_document"),
            Self::SubmitMetadata => write!(f, "submit_metadata"),
            Self::SubmitDocument => write!(f, "submit_document"),
            Self::AccessBucket => write!(f, "access_bucket"),
        }
    }
}

impl StageAction {
    /// Returns the reason the action cannot run right now, if any.
    ///
    /// Every action is unavailable on a blocked stage. A document download
    /// additionally needs the stage to have made some progress.
    #[must_use]
    pub fn unavailable_reason(self, blocked: bool, progress: &StageProgress) -> Option<SkipReason> {
        if blocked {
            return Some(SkipReason::StageBlocked);
        }
        match self {
            Self::DownloadDocument if !progress.is_started() => Some(SkipReason::NoProgress),
            _ => None,
        }
    }

    /// Returns true if the action can run for a stage in this state.
    #[must_use]
    pub fn is_available(self, blocked: bool, progress: &StageProgress) -> bool {
        self.unavailable_reason(blocked, progress).is_none()
    }

    /// The placeholder message a stub port reports for this action.
    #[must_use]
    pub const fn placeholder_message(self) -> &'static str {
        match self {
            Self::DownloadTemplate => "Downloading template sheet...",
            Self::DownloadDocument => "Downloading document...",
            Self::SubmitMetadata => "Submitting metadata...",
            Self::SubmitDocument => "Submitting document...",
            Self::AccessBucket => "Accessing S3 bucket...",
        }
    }
}

/// Why an action was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The stage's predecessor is incomplete.
    StageBlocked,
    /// The stage has no passed checks yet.
    NoProgress,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageBlocked => write!(f, "stage_blocked"),
            Self::NoProgress => write!(f, "no_progress"),
        }
    }
}

/// A request handed to an [`ActionPort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// The stage number.
    pub stage_number: u32,
    /// The stage key.
    pub stage_key: String,
    /// The requested action.
    pub action: StageAction,
    /// The tracker session issuing the request.
    pub session_id: String,
    /// When the request was issued (ISO 8601).
    pub requested_at: String,
}

/// Outcome of [`crate::tracker::PipelineTracker::invoke_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionDispatch {
    /// The request was handed to the port.
    Dispatched,
    /// The action was unavailable and the port was not called.
    Skipped {
        /// Why the action was unavailable.
        reason: SkipReason,
    },
}

impl ActionDispatch {
    /// Returns true if the port was called.
    #[must_use]
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_stage_disables_everything() {
        let progress = StageProgress::from_values([true]);
        for action in [
            StageAction::DownloadTemplate,
            StageAction::DownloadDocument,
            StageAction::SubmitMetadata,
            StageAction::SubmitDocument,
            StageAction::AccessBucket,
        ] {
            assert_eq!(
                action.unavailable_reason(true, &progress),
                Some(SkipReason::StageBlocked)
            );
        }
    }

    #[test]
    fn test_document_download_needs_progress() {
        let none = StageProgress::from_values([false, false]);
        let some = StageProgress::from_values([true, false]);

        assert_eq!(
            StageAction::DownloadDocument.unavailable_reason(false, &none),
            Some(SkipReason::NoProgress)
        );
        assert!(StageAction::DownloadDocument.is_available(false, &some));
        assert!(StageAction::DownloadTemplate.is_available(false, &none));
        assert!(StageAction::AccessBucket.is_available(false, &none));
    }

    #[test]
    fn test_dispatch_serializes_with_tag() {
        let skipped = ActionDispatch::Skipped {
            reason: SkipReason::NoProgress,
        };
        let json = serde_json::to_value(skipped).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"outcome": "skipped", "reason": "no_progress"})
        );
        assert!(!skipped.is_dispatched());
        assert!(ActionDispatch::Dispatched.is_dispatched());
    }
}

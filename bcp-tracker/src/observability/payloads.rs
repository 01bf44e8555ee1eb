//! Event payloads emitted by the tracker.

use serde::{Deserialize, Serialize};

use crate::actions::{SkipReason, StageAction};

/// Payload of a `check.toggled` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleEventPayload {
    /// Tracker session.
    pub session_id: String,
    /// Stage key.
    pub stage: String,
    /// Check name.
    pub check: String,
    /// Value after the toggle.
    pub value: bool,
    /// Unrounded stage percentage after the toggle.
    pub stage_percentage: f64,
    /// Rounded overall percentage after the toggle.
    pub overall_percentage: u32,
    /// When the toggle happened (ISO 8601).
    pub timestamp: String,
}

/// Payload of an `action.dispatched` or `action.skipped` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEventPayload {
    /// Tracker session.
    pub session_id: String,
    /// Stage key.
    pub stage: String,
    /// Requested action.
    pub action: StageAction,
    /// Why the action was skipped, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    /// When the request happened (ISO 8601).
    pub timestamp: String,
}

impl ToggleEventPayload {
    /// Converts to a JSON value for an [`crate::events::EventSink`].
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl ActionEventPayload {
    /// Converts to a JSON value for an [`crate::events::EventSink`].
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

//! Action port trait and implementations.

use parking_lot::RwLock;
use tracing::info;

use super::ActionRequest;

/// Port through which the tracker hands off external actions.
///
/// Actions are fire-and-forget: the tracker defines no response contract, so
/// implementations report their own failures through their own channels.
#[cfg_attr(test, mockall::automock)]
pub trait ActionPort: Send + Sync {
    /// Performs the requested action.
    fn perform(&self, request: &ActionRequest);
}

/// A port that discards every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpActionPort;

impl ActionPort for NoOpActionPort {
    fn perform(&self, _request: &ActionRequest) {}
}

/// A port that only logs each request through `tracing`.
///
/// This is the default port: it stands in for the real downloads,
/// submissions and bucket access until a host wires in its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingActionPort;

impl ActionPort for LoggingActionPort {
    fn perform(&self, request: &ActionRequest) {
        info!(
            stage = %request.stage_key,
            action = %request.action,
            session_id = %request.session_id,
            "{}", request.action.placeholder_message()
        );
    }
}

/// A port that records every request, for tests.
#[derive(Debug, Default)]
pub struct RecordingActionPort {
    requests: RwLock<Vec<ActionRequest>>,
}

impl RecordingActionPort {
    /// Creates a new recording port.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded requests.
    #[must_use]
    pub fn requests(&self) -> Vec<ActionRequest> {
        self.requests.read().clone()
    }

    /// Returns the number of recorded requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.read().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.read().is_empty()
    }
}

impl ActionPort for RecordingActionPort {
    fn perform(&self, request: &ActionRequest) {
        self.requests.write().push(request.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::StageAction;

    fn request(action: StageAction) -> ActionRequest {
        ActionRequest {
            stage_number: 4,
            stage_key: "stage4".to_string(),
            action,
            session_id: "session".to_string(),
            requested_at: "2024-01-01T00:00:00.000000+00:00".to_string(),
        }
    }

    #[test]
    fn test_noop_and_logging_ports() {
        NoOpActionPort.perform(&request(StageAction::AccessBucket));
        LoggingActionPort.perform(&request(StageAction::AccessBucket));
        // Should not panic
    }

    #[test]
    fn test_recording_port() {
        let port = RecordingActionPort::new();
        assert!(port.is_empty());

        port.perform(&request(StageAction::AccessBucket));
        port.perform(&request(StageAction::SubmitDocument));

        assert_eq!(port.len(), 2);
        assert_eq!(port.requests()[1].action, StageAction::SubmitDocument);
    }

    #[test]
    fn test_mock_port_expectations() {
        let mut port = MockActionPort::new();
        port.expect_perform()
            .withf(|req| req.action == StageAction::AccessBucket && req.stage_number == 4)
            .times(1)
            .return_const(());

        port.perform(&request(StageAction::AccessBucket));
    }
}

//! The collaborator-facing tracker.
//!
//! [`PipelineTracker`] owns the registry and the checklist state and exposes
//! the operations a presentation layer needs. It caches nothing: every
//! progress figure, blocked flag and status is recomputed from the current
//! state on each call, so no derived value can lag behind a toggle.

mod snapshot;


pub use snapshot::{ActionSnapshot, CheckSnapshot, DashboardSnapshot, StageSnapshot};

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::actions::{
    ActionDispatch, ActionPort, ActionRequest, LoggingActionPort, StageAction,
};
use crate::config::TrackerConfig;
use crate::core::{
    Automation, OverallHealth, OverallStatus, Responsibility, StageProgress, StageStatus,
};
use crate::errors::{ConfigurationError, ConfigurationErrorKind};
use crate::events::{self, EventSink, NoOpEventSink};
use crate::observability::{self as obs, ActionEventPayload, ToggleEventPayload};
use crate::pipeline::{classifier, dependency, PipelineState};
use crate::registry::{CheckRegistry, StageRef, StageSpec};
use crate::utils::{generate_uuid, iso_timestamp};

/// Tracks check completion for one pipeline during one session.
///
/// Toggling is deliberately unrestricted: any caller may flip any check,
/// whatever the stage's responsibility or blocked status. Blocked stages are
/// read-only only in the presentation layer.
pub struct PipelineTracker {
    registry: CheckRegistry,
    state: PipelineState,
    config: TrackerConfig,
    session_id: Uuid,
    event_sink: Arc<dyn EventSink>,
    action_port: Arc<dyn ActionPort>,
}

impl fmt::Debug for PipelineTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineTracker")
            .field("session_id", &self.session_id)
            .field("stages", &self.registry.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for PipelineTracker {
    fn default() -> Self {
        Self::bcp()
    }
}

impl PipelineTracker {
    /// Creates a tracker with every check false.
    #[must_use]
    pub fn new(registry: CheckRegistry) -> Self {
        let state = PipelineState::new(&registry);
        let session_id = generate_uuid();
        debug!(
            session_id = %session_id,
            stages = registry.len(),
            checks = registry.total_checks(),
            "Pipeline tracker created"
        );

        Self {
            registry,
            state,
            config: TrackerConfig::default(),
            session_id,
            event_sink: Arc::new(NoOpEventSink),
            action_port: Arc::new(LoggingActionPort),
        }
    }

    /// Creates a tracker for the BCP pipeline.
    #[must_use]
    pub fn bcp() -> Self {
        Self::new(CheckRegistry::bcp())
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Sets the action port.
    #[must_use]
    pub fn with_action_port(mut self, port: Arc<dyn ActionPort>) -> Self {
        self.action_port = port;
        self
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Returns the current checklist state.
    #[must_use]
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Installs the global tracing subscriber from `config().logging`.
    ///
    /// Returns false if a subscriber was already installed.
    pub fn init_tracing(&self) -> bool {
        obs::init_tracing(&self.config.logging)
    }

    /// Returns the session identifier.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn stage(&self, stage: impl Into<StageRef>) -> Result<&StageSpec, ConfigurationError> {
        let stage = stage.into();
        self.registry.stage(&stage).map_err(|err| {
            warn!(stage = %stage, "{}", err);
            err
        })
    }

    /// Returns the ordered check names of a stage.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage does not exist.
    pub fn check_names(&self, stage: impl Into<StageRef>) -> Result<&[String], ConfigurationError> {
        self.stage(stage).map(|s| s.checks.as_slice())
    }

    /// Returns the value of one check.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage or check does not exist.
    pub fn value(&self, stage: impl Into<StageRef>, check: &str) -> Result<bool, ConfigurationError> {
        let key = &self.stage(stage)?.key;
        self.state.value(key, check)
    }

    /// Flips one check.
    ///
    /// Only the one value changes; derived figures are recomputed by whoever
    /// asks for them next.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage or check does not exist.
    /// The state is left untouched in that case.
    pub fn toggle(&mut self, stage: impl Into<StageRef>, check: &str) -> Result<(), ConfigurationError> {
        let key = self.stage(stage)?.key.clone();
        let value = self.state.toggle(&key, check).map_err(|err| {
            warn!(stage = %key, check, "{}", err);
            err
        })?;
        debug!(stage = %key, check, value, "Check toggled");

        let payload = ToggleEventPayload {
            session_id: self.session_id.to_string(),
            stage_percentage: self.state.stage_progress(&key)?.percentage,
            overall_percentage: self.state.overall().percentage,
            stage: key,
            check: check.to_string(),
            value,
            timestamp: iso_timestamp(),
        };
        self.event_sink.emit(events::CHECK_TOGGLED, Some(payload.to_value()));
        Ok(())
    }

    /// Computes the progress of one stage.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage does not exist.
    pub fn stage_progress(&self, stage: impl Into<StageRef>) -> Result<StageProgress, ConfigurationError> {
        let key = &self.stage(stage)?.key;
        self.state.stage_progress(key)
    }

    /// Returns true if any direct predecessor of the stage is not exactly
    /// 100% complete. The entry stage and unknown numbers are never blocked.
    #[must_use]
    pub fn is_stage_blocked(&self, stage_number: u32) -> bool {
        dependency::is_blocked(&self.registry, stage_number, |n| {
            let stage = self.registry.by_number(n)?;
            self.state.stage_progress(&stage.key).ok().map(|p| p.percentage)
        })
    }

    /// Returns the party accountable for a stage (lab for unknown numbers).
    #[must_use]
    pub fn responsibility(&self, stage_number: u32) -> Responsibility {
        classifier::responsibility(&self.registry, stage_number)
    }

    /// Returns the automation mode of a stage (manual for unknown numbers).
    #[must_use]
    pub fn automation(&self, stage_number: u32) -> Automation {
        classifier::automation(&self.registry, stage_number)
    }

    /// Derives the blocked/complete/active/pending status of a stage.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage does not exist.
    pub fn stage_status(&self, stage: impl Into<StageRef>) -> Result<StageStatus, ConfigurationError> {
        let spec = self.stage(stage)?;
        let progress = self.state.stage_progress(&spec.key)?;
        Ok(StageStatus::derive(self.is_stage_blocked(spec.number), &progress))
    }

    /// Computes passed/total over every check, with a rounded percentage.
    #[must_use]
    pub fn overall_status(&self) -> OverallStatus {
        self.state.overall()
    }

    /// Classifies overall progress. `Complete` only once every check passed.
    #[must_use]
    pub fn overall_health(&self) -> OverallHealth {
        OverallHealth::from_status(&self.overall_status())
    }

    /// Lists the actions configured for a stage with their current
    /// availability.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage does not exist.
    pub fn available_actions(
        &self,
        stage: impl Into<StageRef>,
    ) -> Result<Vec<(StageAction, bool)>, ConfigurationError> {
        let spec = self.stage(stage)?;
        let progress = self.state.stage_progress(&spec.key)?;
        let blocked = self.is_stage_blocked(spec.number);
        Ok(spec
            .actions
            .iter()
            .map(|action| (*action, action.is_available(blocked, &progress)))
            .collect())
    }

    /// Hands an action to the action port if it is currently available.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage does not exist or does
    /// not offer the action.
    pub fn invoke_action(
        &self,
        stage: impl Into<StageRef>,
        action: StageAction,
    ) -> Result<ActionDispatch, ConfigurationError> {
        let spec = self.stage(stage)?;
        if !spec.offers(action) {
            let err = ConfigurationError::new(
                ConfigurationErrorKind::UnknownAction,
                format!("Stage '{}' does not offer action '{action}'", spec.key),
            )
            .with_stage(spec.key.clone());
            warn!(stage = %spec.key, %action, "{}", err);
            return Err(err);
        }

        let progress = self.state.stage_progress(&spec.key)?;
        let reason = action.unavailable_reason(self.is_stage_blocked(spec.number), &progress);
        let timestamp = iso_timestamp();
        let payload = ActionEventPayload {
            session_id: self.session_id.to_string(),
            stage: spec.key.clone(),
            action,
            skipped: reason,
            timestamp: timestamp.clone(),
        };

        if let Some(reason) = reason {
            debug!(stage = %spec.key, %action, %reason, "Action skipped");
            self.event_sink.emit(events::ACTION_SKIPPED, Some(payload.to_value()));
            return Ok(ActionDispatch::Skipped { reason });
        }

        info!(stage = %spec.key, %action, "Dispatching action");
        self.action_port.perform(&ActionRequest {
            stage_number: spec.number,
            stage_key: spec.key.clone(),
            action,
            session_id: self.session_id.to_string(),
            requested_at: timestamp,
        });
        self.event_sink.emit(events::ACTION_DISPATCHED, Some(payload.to_value()));
        Ok(ActionDispatch::Dispatched)
    }

    /// Renders the full dashboard view from the current state.
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::build(self)
    }
}

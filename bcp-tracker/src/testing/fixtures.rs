//! Test fixtures for tracker testing.

use std::sync::Arc;

use crate::actions::RecordingActionPort;
use crate::errors::ConfigurationError;
use crate::events::CollectingEventSink;
use crate::registry::{CheckRegistry, RegistryDefinition, StageDefinition, StageRef};
use crate::tracker::PipelineTracker;

/// Sets a check to `value`, toggling only if it differs.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] if the stage or check does not exist.
pub fn set_check(
    tracker: &mut PipelineTracker,
    stage: impl Into<StageRef>,
    check: &str,
    value: bool,
) -> Result<(), ConfigurationError> {
    let stage = stage.into();
    if tracker.value(stage.clone(), check)? != value {
        tracker.toggle(stage, check)?;
    }
    Ok(())
}

/// A registry of `count` stages `s1..sN` in a linear chain, each with
/// `checks_per_stage` checks named `c1..cM`.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] if either count is zero.
pub fn linear_registry(count: u32, checks_per_stage: usize) -> Result<CheckRegistry, ConfigurationError> {
    let stages = (1..=count)
        .map(|n| {
            let checks = (1..=checks_per_stage).map(|c| format!("c{c}"));
            StageDefinition::new(n, format!("s{n}"), format!("Stage {n}"), checks)
        })
        .collect();
    CheckRegistry::new(RegistryDefinition::new(stages))
}

/// A tracker wired to a collecting event sink and a recording action port.
pub struct TrackerFixture {
    /// The tracker under test.
    pub tracker: PipelineTracker,
    /// Events emitted by the tracker.
    pub events: Arc<CollectingEventSink>,
    /// Actions dispatched by the tracker.
    pub actions: Arc<RecordingActionPort>,
}

impl TrackerFixture {
    /// Creates a fixture over the BCP registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(CheckRegistry::bcp())
    }

    /// Creates a fixture over a custom registry.
    #[must_use]
    pub fn with_registry(registry: CheckRegistry) -> Self {
        let events = Arc::new(CollectingEventSink::new());
        let actions = Arc::new(RecordingActionPort::new());
        let tracker = PipelineTracker::new(registry)
            .with_event_sink(events.clone())
            .with_action_port(actions.clone());

        Self {
            tracker,
            events,
            actions,
        }
    }

    /// Sets every check of a stage to true.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the stage does not exist.
    pub fn complete_stage(&mut self, stage: impl Into<StageRef>) -> Result<&mut Self, ConfigurationError> {
        let stage = stage.into();
        let checks = self.tracker.check_names(stage.clone())?.to_vec();
        for check in &checks {
            set_check(&mut self.tracker, stage.clone(), check, true)?;
        }
        Ok(self)
    }

    /// Completes every stage numbered `1..=last`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if a stage in the range does not
    /// exist.
    pub fn complete_through(&mut self, last: u32) -> Result<&mut Self, ConfigurationError> {
        for n in 1..=last {
            self.complete_stage(n)?;
        }
        Ok(self)
    }

    /// Completes every registered stage.
    #[must_use]
    pub fn completed() -> Self {
        let mut fixture = Self::new();
        let keys: Vec<String> = fixture
            .tracker
            .registry()
            .stages()
            .iter()
            .map(|s| s.key.clone())
            .collect();
        for key in keys {
            // Keys come from the registry itself.
            let _ = fixture.complete_stage(key);
        }
        fixture
    }
}

impl Default for TrackerFixture {
    fn default() -> Self {
        Self::new()
    }
}

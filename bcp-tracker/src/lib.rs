//! # BCP tracker
//!
//! Progress tracking for the BCP data generation and deposition pipeline.
//!
//! The pipeline is a fixed chain of seven stages, from library generation to
//! curated H5AD deposition. Each stage carries a checklist of boolean quality
//! gates. From the checklist the tracker derives:
//!
//! - **Stage progress**: passed/total and an unrounded percentage per stage
//! - **Blocking**: a stage is blocked while any direct predecessor is not
//!   exactly 100% complete
//! - **Classification**: who is responsible for a stage and whether it runs
//!   automatically
//! - **Overall status**: passed/total over every check with a rounded
//!   percentage
//!
//! ## Quick Start
//!
//! ```rust
//! use bcp_tracker::prelude::*;
//!
//! let mut tracker = PipelineTracker::bcp();
//! assert!(tracker.is_stage_blocked(2));
//!
//! tracker.toggle("stage1", "spreadsheetCompleted")?;
//! tracker.toggle("stage1", "spreadsheetValidated")?;
//!
//! assert!(!tracker.is_stage_blocked(2));
//! assert_eq!(tracker.overall_status().percentage, 15);
//! # Ok::<(), ConfigurationError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod actions;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod testing;
pub mod tracker;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::actions::{
        ActionDispatch, ActionPort, ActionRequest, LoggingActionPort, NoOpActionPort,
        RecordingActionPort, SkipReason, StageAction,
    };
    pub use crate::config::{LoggingConfig, TrackerConfig};
    pub use crate::core::{
        Automation, OverallHealth, OverallStatus, Responsibility, StageProgress, StageStatus,
    };
    pub use crate::errors::{
        ConfigurationError, ConfigurationErrorKind, ContractErrorInfo, TrackerError,
    };
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::observability::init_tracing;
    pub use crate::pipeline::PipelineState;
    pub use crate::registry::{
        CheckRegistry, RegistryDefinition, StageDefinition, StageRef, StageSpec,
    };
    pub use crate::tracker::{DashboardSnapshot, PipelineTracker, StageSnapshot};
    pub use crate::utils::{check_label, generate_uuid, iso_timestamp, Timestamp};
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_prelude_covers_basic_flow() {
        let mut tracker = PipelineTracker::new(CheckRegistry::bcp())
            .with_config(TrackerConfig::default())
            .with_event_sink(std::sync::Arc::new(NoOpEventSink));

        tracker.toggle(1_u32, "spreadsheetCompleted").unwrap();
        assert_eq!(tracker.stage_status(1_u32).unwrap(), StageStatus::Active);
    }
}

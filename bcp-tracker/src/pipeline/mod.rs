//! Pipeline state and the pure derivations over it.
//!
//! This module provides:
//! - The mutable checklist store
//! - Blocking from direct predecessors
//! - Responsibility and automation classification

pub mod classifier;
pub mod dependency;
mod state;

pub use state::PipelineState;

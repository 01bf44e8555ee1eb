//! Testing utilities for tracker consumers.
//!
//! This module provides:
//! - Fixtures that build trackers in a given state
//! - Assertions over stage progress and blocking
//! - A small synthetic registry for topology tests

mod assertions;
mod fixtures;

pub use assertions::{
    assert_overall, assert_stage_blocked, assert_stage_open, assert_stage_percentage,
    assert_stage_status,
};
pub use fixtures::{linear_registry, set_check, TrackerFixture};

//! Core value types: progress figures and the classification/status enums.

mod progress;
mod status;

pub use progress::{OverallStatus, StageProgress};
pub use status::{Automation, OverallHealth, Responsibility, StageStatus};

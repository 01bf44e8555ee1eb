//! Small helpers: timestamps, identifiers and check labels.

mod labels;
pub mod timestamps;

pub use labels::check_label;
pub use timestamps::{format_timestamp, iso_timestamp, Timestamp};

use uuid::Uuid;

/// Generates a new UUID v4.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}

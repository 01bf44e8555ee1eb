//! Observability utilities.

mod payloads;
mod subscriber;

pub use payloads::{ActionEventPayload, ToggleEventPayload};
pub use subscriber::init_tracing;

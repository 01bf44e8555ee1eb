//! Event sinks for observability.
//!
//! The tracker reports mutations and action dispatches to an injected
//! [`EventSink`]. Sinks are fire-and-forget observers: the core never waits
//! on them and never reads anything back.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// Emitted after a check was flipped.
pub const CHECK_TOGGLED: &str = "check.toggled";
/// Emitted after an action was handed to the action port.
pub const ACTION_DISPATCHED: &str = "action.dispatched";
/// Emitted when an action was requested but unavailable.
pub const ACTION_SKIPPED: &str = "action.skipped";

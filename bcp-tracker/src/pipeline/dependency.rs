//! Stage blocking from predecessor completeness.

use crate::registry::CheckRegistry;

/// Returns true if a stage is blocked.
///
/// A stage is blocked iff any of its *direct* predecessors is not exactly
/// 100% complete. Ancestors further back are not re-checked: a stage whose
/// predecessor was completed out of order is available even if an earlier
/// stage is still open.
///
/// Stages without predecessors (the entry stage) and stage numbers the
/// registry does not know are never blocked. `percentage_of` is queried for
/// predecessors only; a predecessor it cannot answer for counts as
/// incomplete.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_blocked<F>(registry: &CheckRegistry, stage_number: u32, percentage_of: F) -> bool
where
    F: Fn(u32) -> Option<f64>,
{
    registry.by_number(stage_number).is_some_and(|stage| {
        stage
            .dependencies
            .iter()
            .any(|dep| percentage_of(*dep) != Some(100.0))
    })
}

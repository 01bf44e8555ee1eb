//! Responsibility and automation lookups.
//!
//! Both lookups are total: a stage number the registry does not know gets
//! the default tag instead of an error.

use crate::core::{Automation, Responsibility};
use crate::registry::CheckRegistry;

/// Returns the party accountable for a stage, defaulting to the lab.
#[must_use]
pub fn responsibility(registry: &CheckRegistry, stage_number: u32) -> Responsibility {
    registry
        .by_number(stage_number)
        .map(|stage| stage.responsibility)
        .unwrap_or_default()
}

/// Returns whether a stage is automatic, defaulting to manual.
#[must_use]
pub fn automation(registry: &CheckRegistry, stage_number: u32) -> Automation {
    registry
        .by_number(stage_number)
        .map(|stage| stage.automation)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bcp_responsibilities() {
        let registry = CheckRegistry::bcp();
        let tags: Vec<Responsibility> = (1..=7).map(|n| responsibility(&registry, n)).collect();

        assert_eq!(
            tags,
            vec![
                Responsibility::Lab,
                Responsibility::Lab,
                Responsibility::Lab,
                Responsibility::Partner,
                Responsibility::Coordinator,
                Responsibility::Partner,
                Responsibility::Curator,
            ]
        );
    }

    #[test]
    fn test_bcp_automation() {
        let registry = CheckRegistry::bcp();
        let automatic: Vec<u32> = (1..=7)
            .filter(|n| automation(&registry, *n) == Automation::Automatic)
            .collect();

        assert_eq!(automatic, vec![2, 5, 6]);
    }

    #[test]
    fn test_unknown_stage_numbers_use_defaults() {
        let registry = CheckRegistry::bcp();

        for n in [0, 8, 42, u32::MAX] {
            assert_eq!(responsibility(&registry, n), Responsibility::Lab);
            assert_eq!(automation(&registry, n), Automation::Manual);
        }
    }
}

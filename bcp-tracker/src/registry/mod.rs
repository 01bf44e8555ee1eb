//! Static pipeline configuration.
//!
//! A [`RegistryDefinition`] is the single configuration table (stage number,
//! key, checks, responsibility, automation, dependencies, actions). It is
//! validated once into a [`CheckRegistry`], which every lookup in the crate
//! consults.

mod check_registry;
mod definition;

pub use check_registry::{CheckRegistry, StageRef, StageSpec};
pub use definition::{RegistryDefinition, StageDefinition};

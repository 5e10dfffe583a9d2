//! Type registry, instance storage, and graph snapshots for Ontograph.
//!
//! This crate provides:
//! - [`TypeRegistry`] - Typed hierarchies of roles, resources, relations, and entities
//! - [`InstanceStore`] - Instance allocation, resource deduplication, attribute edges
//! - [`RolePlayerStore`] - Bidirectional role-player indices
//! - [`Graph`] - Schema-checked graph state with structural sharing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod graph;
mod instance;
mod relationship;
mod schema;

pub use graph::Graph;
pub use instance::{Instance, InstanceKind, InstanceStore};
pub use relationship::RolePlayerStore;
pub use schema::{Ancestors, TypeDef, TypeRegistry};

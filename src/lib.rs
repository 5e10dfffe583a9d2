//! Ontograph - Typed knowledge graphs with transactional validation
//!
//! This crate re-exports all layers of the Ontograph system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: ontograph_engine    : Keyspaces, transactions, commit validation
//! Layer 1: ontograph_storage   : Type registry, instances, role players, graph
//! Layer 0: ontograph_foundation: Core types (TypeId, InstanceId, Value, Error)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use ontograph_engine as engine;
pub use ontograph_foundation as foundation;
pub use ontograph_storage as storage;

pub use ontograph_engine::{CommitSummary, Keyspace, KeyspaceConfig, ReportMode, Transaction};
pub use ontograph_foundation::{DataType, Error, ErrorKind, InstanceId, Kind, Result, TypeId, Value};
pub use ontograph_storage::Graph;

pub mod genealogy;

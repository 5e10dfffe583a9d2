//! Keyspaces, transactions, and commit-time validation for Ontograph.
//!
//! This crate provides:
//! - [`Keyspace`] - A published graph snapshot with optimistic versioning
//! - [`Transaction`] - Batched schema and data changes with commit/abort
//! - [`Validator`] - Relation completeness and schema re-verification
//! - [`KeyspaceConfig`] - Violation reporting and stale-commit policy

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod transaction;
pub mod validate;

pub use config::{KeyspaceConfig, ReportMode};
pub use transaction::{CommitSummary, Keyspace, Transaction, TransactionState};
pub use validate::{ValidationReport, Validator};

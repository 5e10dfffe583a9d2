//! Cross-layer integration tests for Ontograph
//!
//! Tests that verify correct interaction between multiple crates.

mod genealogy;

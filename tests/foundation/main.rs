//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, identifiers, and Error.

mod errors;
mod values;

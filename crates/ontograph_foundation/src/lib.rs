//! Core identifiers, values, and errors for Ontograph.
//!
//! This crate provides:
//! - [`TypeId`] and [`InstanceId`] - Arena and instance identifiers
//! - [`Value`] - Resource values with exact equality
//! - [`Kind`] and [`DataType`] - Schema kinds and resource value kinds
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod ids;
mod types;
mod value;

pub use error::{Error, ErrorContext, ErrorKind, ValidationErrors};
pub use ids::{InstanceId, TypeId};
pub use types::{DataType, Kind};
pub use value::Value;

/// Result type for Ontograph operations.
pub type Result<T> = std::result::Result<T, Error>;

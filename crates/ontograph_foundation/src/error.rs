//! Error types for the Ontograph system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Errors fall into three groups:
//! - schema-time (`TypeConflict`, `KindMismatch`, `CyclicHierarchy`, `UnknownType`)
//! - instance-time, raised at the offending call (`TypeMismatch`,
//!   `AbstractInstantiation`, `IllegalAttribute`, `IllegalRole`, `IllegalRolePlayer`)
//! - commit-time (`IncompleteRelation`, aggregated into [`ValidationErrors`])

use std::fmt;

use thiserror::Error;

use crate::ids::InstanceId;
use crate::types::{DataType, Kind};

/// The main error type for Ontograph operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a type conflict error.
    #[must_use]
    pub fn type_conflict(
        label: impl Into<String>,
        existing: impl fmt::Display,
        requested: impl fmt::Display,
    ) -> Self {
        Self::new(ErrorKind::TypeConflict {
            label: label.into(),
            existing: existing.to_string(),
            requested: requested.to_string(),
        })
    }

    /// Creates a kind mismatch error.
    #[must_use]
    pub fn kind_mismatch(label: impl Into<String>, expected: Kind, actual: Kind) -> Self {
        Self::new(ErrorKind::KindMismatch {
            label: label.into(),
            expected,
            actual,
        })
    }

    /// Creates a cyclic hierarchy error.
    #[must_use]
    pub fn cyclic_hierarchy(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::new(ErrorKind::CyclicHierarchy {
            child: child.into(),
            parent: parent.into(),
        })
    }

    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(label: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownType(label.into()))
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(label: impl Into<String>, expected: DataType, actual: DataType) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            label: label.into(),
            expected,
            actual,
        })
    }

    /// Creates an abstract instantiation error.
    #[must_use]
    pub fn abstract_instantiation(label: impl Into<String>) -> Self {
        Self::new(ErrorKind::AbstractInstantiation(label.into()))
    }

    /// Creates an illegal attribute error.
    #[must_use]
    pub fn illegal_attribute(owner: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalAttribute {
            owner: owner.into(),
            resource: resource.into(),
        })
    }

    /// Creates an illegal role error.
    #[must_use]
    pub fn illegal_role(relation: impl Into<String>, role: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalRole {
            relation: relation.into(),
            role: role.into(),
        })
    }

    /// Creates an illegal role player error.
    #[must_use]
    pub fn illegal_role_player(role: impl Into<String>, player: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalRolePlayer {
            role: role.into(),
            player: player.into(),
        })
    }

    /// Creates an unknown instance error.
    #[must_use]
    pub fn unknown_instance(id: InstanceId) -> Self {
        Self::new(ErrorKind::UnknownInstance(id))
    }

    /// Creates an unowned resource error.
    #[must_use]
    pub fn unowned(resource_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unowned {
            resource_type: resource_type.into(),
            value: value.into(),
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::new(ErrorKind::Validation(errors))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// A label was redeclared with a different kind or data type.
    #[error("type conflict: `{label}` is already declared as {existing}, not {requested}")]
    TypeConflict {
        /// The contested label.
        label: String,
        /// Description of the existing declaration.
        existing: String,
        /// Description of the rejected declaration.
        requested: String,
    },

    /// A type of the wrong kind was supplied.
    #[error("kind mismatch: `{label}` is of kind {actual}, expected {expected}")]
    KindMismatch {
        /// The offending type.
        label: String,
        /// The kind the operation required.
        expected: Kind,
        /// The kind actually supplied.
        actual: Kind,
    },

    /// Setting a supertype would close a cycle.
    #[error("cyclic hierarchy: `{parent}` is already a subtype of `{child}`")]
    CyclicHierarchy {
        /// The type whose supertype was being set.
        child: String,
        /// The rejected supertype.
        parent: String,
    },

    /// No type is declared under this label.
    #[error("unknown type: `{0}`")]
    UnknownType(String),

    /// A value does not match the resource type's data type.
    #[error("type mismatch on `{label}`: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The resource type.
        label: String,
        /// The declared data type.
        expected: DataType,
        /// The data type of the supplied value.
        actual: DataType,
    },

    /// Attempted to instantiate or directly assign an abstract type.
    #[error("abstract type `{0}` cannot be instantiated")]
    AbstractInstantiation(String),

    /// The owner's type does not permit this resource type.
    #[error("illegal attribute: `{owner}` may not have `{resource}`")]
    IllegalAttribute {
        /// Type label of the owning instance.
        owner: String,
        /// Type label of the resource.
        resource: String,
    },

    /// The relation type does not relate this role.
    #[error("illegal role: `{relation}` does not relate `{role}`")]
    IllegalRole {
        /// Type label of the relation.
        relation: String,
        /// Label of the role.
        role: String,
    },

    /// The player's type may not play this role.
    #[error("illegal role player: `{player}` may not play `{role}`")]
    IllegalRolePlayer {
        /// Label of the role.
        role: String,
        /// Type label of the player.
        player: String,
    },

    /// A relation is missing a player for a mandatory role.
    #[error("incomplete relation {relation} of type `{relation_type}`: no player for `{missing_role}`")]
    IncompleteRelation {
        /// The incomplete relation instance.
        relation: InstanceId,
        /// Type label of the relation.
        relation_type: String,
        /// Label of the unfilled role.
        missing_role: String,
    },

    /// No instance exists with this id.
    #[error("unknown instance: {0}")]
    UnknownInstance(InstanceId),

    /// A resource has several owners where exactly one was requested.
    #[error("resource {resource} has {owners} owners")]
    AmbiguousOwner {
        /// The shared resource.
        resource: InstanceId,
        /// How many instances own it.
        owners: usize,
    },

    /// No instance owns the resource holding this value.
    #[error("no instance owns `{resource_type}` {value}")]
    Unowned {
        /// Label of the resource type searched.
        resource_type: String,
        /// The value searched for.
        value: String,
    },

    /// The transaction has already been committed or aborted.
    #[error("transaction is {0}")]
    TransactionClosed(String),

    /// Another transaction committed after this one was opened.
    #[error("stale transaction: opened at version {opened_at}, keyspace is at version {current}")]
    StaleTransaction {
        /// Keyspace version the transaction was opened at.
        opened_at: u64,
        /// Keyspace version at commit time.
        current: u64,
    },

    /// Commit-time validation failed.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Batch of violations found while validating a commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    violations: Vec<ErrorKind>,
}

impl ValidationErrors {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation.
    pub fn push(&mut self, violation: ErrorKind) {
        self.violations.push(violation);
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the first violation, if any.
    #[must_use]
    pub fn first(&self) -> Option<&ErrorKind> {
        self.violations.first()
    }

    /// Iterates over the violations in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &ErrorKind> {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed with {} error(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl FromIterator<ErrorKind> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ErrorKind>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// Keyspace the failing transaction belonged to.
    pub keyspace: Option<String>,
    /// Name of the failing operation.
    pub operation: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the keyspace.
    #[must_use]
    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = Some(keyspace.into());
        self
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, "in {operation}")?;
        }
        if let Some(keyspace) = &self.keyspace {
            if self.operation.is_some() {
                f.write_str(" ")?;
            }
            write!(f, "on keyspace `{keyspace}`")?;
        }
        Ok(())
    }
}

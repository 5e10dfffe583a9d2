//! Type descriptors: schema kinds and resource value kinds.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The four kinds of schema type.
///
/// Type names are unique across all kinds, and a type may only be
/// parented by a type of the same kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kind {
    /// A named slot in a relation.
    Role,
    /// A value-typed attribute.
    Resource,
    /// An n-ary association defined by its roles.
    Relation,
    /// A standalone classification.
    Entity,
}

impl Kind {
    /// Returns true for kinds whose instances can play roles and own
    /// resources (entities and relations).
    #[must_use]
    pub const fn is_thing(self) -> bool {
        matches!(self, Self::Entity | Self::Relation)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Role => "role",
            Self::Resource => "resource",
            Self::Relation => "relation",
            Self::Entity => "entity",
        };
        f.write_str(name)
    }
}

/// Value kind declared by a resource type.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataType {
    /// UTF-8 string.
    String,
    /// 64-bit signed integer.
    Long,
    /// 64-bit floating point.
    Double,
    /// Boolean.
    Boolean,
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Long => write!(f, "long"),
            Self::Double => write!(f, "double"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

//! Type registry: schema types and their single-parent hierarchies.
//!
//! All four kinds of type (role, resource, relation, entity) live in one
//! arena indexed by [`TypeId`]. Parents are stored as ids, so a hierarchy
//! never forms ownership cycles. Permission queries walk the ancestor
//! chain of both the asking type and the requested type.

use std::fmt;
use std::sync::Arc;

use im::{HashMap, OrdSet, Vector};
use ontograph_foundation::{DataType, Error, Kind, Result, TypeId};

/// A declared schema type.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDef {
    id: TypeId,
    label: Arc<str>,
    kind: Kind,
    /// Only set for resource types.
    data_type: Option<DataType>,
    supertype: Option<TypeId>,
    is_abstract: bool,
    /// Roles this relation type declares as slots.
    relates: OrdSet<TypeId>,
    /// Roles instances of this type may play.
    plays: OrdSet<TypeId>,
    /// Resource types instances of this type may carry.
    resources: OrdSet<TypeId>,
}

impl TypeDef {
    fn new(id: TypeId, label: Arc<str>, kind: Kind, data_type: Option<DataType>) -> Self {
        Self {
            id,
            label,
            kind,
            data_type,
            supertype: None,
            is_abstract: false,
            relates: OrdSet::new(),
            plays: OrdSet::new(),
            resources: OrdSet::new(),
        }
    }

    /// Returns the type's id.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the type's unique label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the type's kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the declared data type (resource types only).
    #[must_use]
    pub fn data_type(&self) -> Option<DataType> {
        self.data_type
    }

    /// Returns the direct supertype, if any.
    #[must_use]
    pub fn supertype(&self) -> Option<TypeId> {
        self.supertype
    }

    /// Returns true if this type cannot be instantiated directly.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Roles declared directly on this relation type.
    pub fn relates(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.relates.iter().copied()
    }

    /// Roles declared directly as playable by this type.
    pub fn plays(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.plays.iter().copied()
    }

    /// Resource types declared directly on this type.
    pub fn resources(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.resources.iter().copied()
    }

    /// Describes the declaration for conflict messages, e.g. `resource<string>`.
    fn signature(&self) -> Signature {
        Signature {
            kind: self.kind,
            data_type: self.data_type,
        }
    }
}

/// Kind plus data type, as shown in `TypeConflict` errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Signature {
    kind: Kind,
    data_type: Option<DataType>,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data_type {
            Some(data_type) => write!(f, "{}<{data_type}>", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Lazy walk from a type up to the root of its hierarchy.
///
/// Yields the starting type first. Terminates because the registry
/// rejects any supertype assignment that would close a cycle.
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    registry: &'a TypeRegistry,
    next: Option<TypeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<TypeId> {
        let current = self.next?;
        self.next = self.registry.get(current).and_then(TypeDef::supertype);
        Some(current)
    }
}

/// Stores every declared type, indexed by id and by label.
///
/// Clone is cheap: all indices are persistent collections, so a cloned
/// registry shares structure with the original until either is mutated.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: Vector<TypeDef>,
    labels: HashMap<Arc<str>, TypeId>,
    /// Direct subtypes of each type.
    subtypes: HashMap<TypeId, OrdSet<TypeId>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no types are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Gets a type by id.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(id.index() as usize)
    }

    /// Gets a type by id, failing with `UnknownType` if it was never
    /// issued by this registry.
    pub fn def(&self, id: TypeId) -> Result<&TypeDef> {
        self.get(id).ok_or_else(|| Error::unknown_type(id.to_string()))
    }

    /// Returns the label of a type, or a placeholder for unknown ids.
    #[must_use]
    pub fn label(&self, id: TypeId) -> String {
        self.get(id)
            .map_or_else(|| id.to_string(), |def| def.label().to_string())
    }

    /// Looks up a type id by label.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<TypeId> {
        self.labels.get(label).copied()
    }

    /// Resolves a label to a type id.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if no type carries this label.
    pub fn resolve(&self, label: &str) -> Result<TypeId> {
        self.lookup(label).ok_or_else(|| Error::unknown_type(label))
    }

    // --- Declaration ---

    /// Declares a type, or returns the existing one with this label.
    ///
    /// # Errors
    ///
    /// Returns `TypeConflict` if the label is already declared with a
    /// different kind, or (for resource types) a different data type.
    pub fn declare(
        &mut self,
        label: &str,
        kind: Kind,
        data_type: Option<DataType>,
    ) -> Result<TypeId> {
        let requested = Signature { kind, data_type };

        if let Some(existing) = self.lookup(label) {
            let def = self.def(existing)?;
            if def.signature() != requested {
                return Err(Error::type_conflict(label, def.signature(), requested));
            }
            return Ok(existing);
        }

        let index = u32::try_from(self.types.len())
            .map_err(|_| Error::internal("type registry is full"))?;
        let id = TypeId::new(index);
        let label: Arc<str> = Arc::from(label);
        self.types
            .push_back(TypeDef::new(id, Arc::clone(&label), kind, data_type));
        self.labels.insert(label, id);
        Ok(id)
    }

    /// Declares a role type.
    pub fn declare_role(&mut self, label: &str) -> Result<TypeId> {
        self.declare(label, Kind::Role, None)
    }

    /// Declares a resource type with the given data type.
    pub fn declare_resource(&mut self, label: &str, data_type: DataType) -> Result<TypeId> {
        self.declare(label, Kind::Resource, Some(data_type))
    }

    /// Declares a relation type.
    pub fn declare_relation(&mut self, label: &str) -> Result<TypeId> {
        self.declare(label, Kind::Relation, None)
    }

    /// Declares an entity type.
    pub fn declare_entity(&mut self, label: &str) -> Result<TypeId> {
        self.declare(label, Kind::Entity, None)
    }

    // --- Hierarchy ---

    /// Sets the supertype of `child` to `parent`, replacing any previous
    /// supertype.
    ///
    /// # Errors
    ///
    /// - `KindMismatch` if the two types are of different kinds
    /// - `CyclicHierarchy` if `parent` is `child` or already descends from it
    /// - `TypeMismatch` if two resource types declare different data types
    pub fn set_supertype(&mut self, child: TypeId, parent: TypeId) -> Result<()> {
        let child_def = self.def(child)?;
        let parent_def = self.def(parent)?;

        if child_def.kind != parent_def.kind {
            return Err(Error::kind_mismatch(
                parent_def.label(),
                child_def.kind,
                parent_def.kind,
            ));
        }

        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(Error::cyclic_hierarchy(
                child_def.label(),
                parent_def.label(),
            ));
        }

        if let (Some(expected), Some(actual)) = (parent_def.data_type, child_def.data_type) {
            if expected != actual {
                return Err(Error::type_mismatch(child_def.label(), expected, actual));
            }
        }

        let previous = child_def.supertype;
        if previous == Some(parent) {
            return Ok(());
        }
        if let Some(previous) = previous {
            if let Some(siblings) = self.subtypes.get_mut(&previous) {
                siblings.remove(&child);
            }
        }
        self.subtypes
            .entry(parent)
            .or_insert_with(OrdSet::new)
            .insert(child);
        self.def_mut(child)?.supertype = Some(parent);
        Ok(())
    }

    /// Marks a type abstract or concrete.
    pub fn set_abstract(&mut self, id: TypeId, is_abstract: bool) -> Result<()> {
        self.def_mut(id)?.is_abstract = is_abstract;
        Ok(())
    }

    /// Iterates from `id` up to the root of its hierarchy.
    #[must_use]
    pub fn ancestors(&self, id: TypeId) -> Ancestors<'_> {
        Ancestors {
            registry: self,
            next: self.get(id).map(TypeDef::id),
        }
    }

    /// Returns true if `sub` is `sup` or descends from it.
    #[must_use]
    pub fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        self.ancestors(sub).any(|ancestor| ancestor == sup)
    }

    /// Direct subtypes of a type.
    pub fn subtypes(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.subtypes
            .get(&id)
            .into_iter()
            .flat_map(|children| children.iter().copied())
    }

    /// All declared types of one kind, in declaration order.
    pub fn types_of_kind(&self, kind: Kind) -> impl Iterator<Item = &TypeDef> + '_ {
        self.types.iter().filter(move |def| def.kind == kind)
    }

    // --- Schema building ---

    /// Records that `relation` declares `role` as one of its slots.
    ///
    /// # Errors
    ///
    /// Returns `KindMismatch` unless `relation` is a relation type and
    /// `role` a role type.
    pub fn add_relates(&mut self, relation: TypeId, role: TypeId) -> Result<()> {
        self.expect_kind(relation, Kind::Relation)?;
        self.expect_kind(role, Kind::Role)?;
        self.def_mut(relation)?.relates.insert(role);
        Ok(())
    }

    /// Records that instances of `owner` may play `role`.
    ///
    /// # Errors
    ///
    /// Returns `KindMismatch` unless `owner` is an entity or relation type
    /// and `role` a role type.
    pub fn add_plays(&mut self, owner: TypeId, role: TypeId) -> Result<()> {
        self.expect_thing(owner)?;
        self.expect_kind(role, Kind::Role)?;
        self.def_mut(owner)?.plays.insert(role);
        Ok(())
    }

    /// Records that instances of `owner` may carry resources of `resource`.
    ///
    /// # Errors
    ///
    /// Returns `KindMismatch` unless `owner` is an entity or relation type
    /// and `resource` a resource type.
    pub fn add_resource(&mut self, owner: TypeId, resource: TypeId) -> Result<()> {
        self.expect_thing(owner)?;
        self.expect_kind(resource, Kind::Resource)?;
        self.def_mut(owner)?.resources.insert(resource);
        Ok(())
    }

    // --- Permission queries ---

    /// Returns true if `relation` (or a supertype) relates exactly `role`.
    #[must_use]
    pub fn relates(&self, relation: TypeId, role: TypeId) -> bool {
        self.permits(relation, role, |def| &def.relates)
    }

    /// Returns true if `owner` (or a supertype) plays exactly `role`.
    #[must_use]
    pub fn plays(&self, owner: TypeId, role: TypeId) -> bool {
        self.permits(owner, role, |def| &def.plays)
    }

    /// Returns true if `owner` (or a supertype) may carry exactly `resource`.
    ///
    /// Permission on a resource type does not cover its subtypes.
    #[must_use]
    pub fn may_have(&self, owner: TypeId, resource: TypeId) -> bool {
        self.permits(owner, resource, |def| &def.resources)
    }

    /// Roles a relation of this type must fill before it can be committed.
    ///
    /// Only roles related directly by `relation` count. A related role
    /// whose supertype is related too belongs to that supertype's group,
    /// so the result holds the roots of each group; a group is filled by a
    /// player in its root role or any descendant role.
    #[must_use]
    pub fn mandatory_roles(&self, relation: TypeId) -> Vec<TypeId> {
        let Some(def) = self.get(relation) else {
            return Vec::new();
        };
        def.relates
            .iter()
            .copied()
            .filter(|&role| {
                !self
                    .ancestors(role)
                    .skip(1)
                    .any(|ancestor| def.relates.contains(&ancestor))
            })
            .collect()
    }

    fn permits<F>(&self, owner: TypeId, target: TypeId, granted: F) -> bool
    where
        F: Fn(&TypeDef) -> &OrdSet<TypeId>,
    {
        self.ancestors(owner)
            .filter_map(|ancestor| self.get(ancestor))
            .any(|def| granted(def).contains(&target))
    }

    fn def_mut(&mut self, id: TypeId) -> Result<&mut TypeDef> {
        self.types
            .get_mut(id.index() as usize)
            .ok_or_else(|| Error::unknown_type(id.to_string()))
    }

    fn expect_kind(&self, id: TypeId, kind: Kind) -> Result<()> {
        let def = self.def(id)?;
        if def.kind == kind {
            Ok(())
        } else {
            Err(Error::kind_mismatch(def.label(), kind, def.kind))
        }
    }

    fn expect_thing(&self, id: TypeId) -> Result<()> {
        let def = self.def(id)?;
        if def.kind.is_thing() {
            Ok(())
        } else {
            Err(Error::kind_mismatch(def.label(), Kind::Entity, def.kind))
        }
    }
}

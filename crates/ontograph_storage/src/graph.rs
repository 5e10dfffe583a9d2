//! Graph state with immutable, structurally shared snapshots.
//!
//! The `Graph` is the unified interface to the type registry, the instance
//! store, and the role-player index. Every mutation checks the schema rules
//! first and only then touches storage, so a failed call leaves the graph
//! exactly as it was.

use std::sync::Arc;

use ontograph_foundation::{DataType, Error, ErrorKind, InstanceId, Kind, Result, TypeId, Value};
use tracing::debug;

use crate::instance::{Instance, InstanceKind, InstanceStore};
use crate::relationship::RolePlayerStore;
use crate::schema::{TypeDef, TypeRegistry};

/// Snapshot of schema and data.
///
/// Clone is O(1) due to structural sharing via `Arc` and persistent
/// collections; mutation copies only the touched parts.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    /// Declared types.
    types: Arc<TypeRegistry>,
    /// Entities, resources, relations, and attribute edges.
    instances: Arc<InstanceStore>,
    /// Role-player edges.
    role_players: Arc<RolePlayerStore>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the type registry.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Returns the instance store.
    #[must_use]
    pub fn instances(&self) -> &InstanceStore {
        &self.instances
    }

    fn types_mut(&mut self) -> &mut TypeRegistry {
        Arc::make_mut(&mut self.types)
    }

    fn instances_mut(&mut self) -> &mut InstanceStore {
        Arc::make_mut(&mut self.instances)
    }

    fn role_players_mut(&mut self) -> &mut RolePlayerStore {
        Arc::make_mut(&mut self.role_players)
    }

    // --- Schema ---

    /// Declares a role type (idempotent by label).
    pub fn put_role_type(&mut self, label: &str) -> Result<TypeId> {
        self.declare(label, Kind::Role, None)
    }

    /// Declares a resource type with the given data type (idempotent by label).
    pub fn put_resource_type(&mut self, label: &str, data_type: DataType) -> Result<TypeId> {
        self.declare(label, Kind::Resource, Some(data_type))
    }

    /// Declares a relation type (idempotent by label).
    pub fn put_relation_type(&mut self, label: &str) -> Result<TypeId> {
        self.declare(label, Kind::Relation, None)
    }

    /// Declares an entity type (idempotent by label).
    pub fn put_entity_type(&mut self, label: &str) -> Result<TypeId> {
        self.declare(label, Kind::Entity, None)
    }

    fn declare(&mut self, label: &str, kind: Kind, data_type: Option<DataType>) -> Result<TypeId> {
        if let Some(existing) = self.types.lookup(label) {
            // Route through the registry for the conflict check without
            // copying it when nothing changes.
            let def = self.types.def(existing)?;
            if def.kind() == kind && def.data_type() == data_type {
                return Ok(existing);
            }
        }
        let id = self.types_mut().declare(label, kind, data_type)?;
        debug!(label, %kind, type_id = %id, "declared type");
        Ok(id)
    }

    /// Resolves a type label.
    pub fn resolve(&self, label: &str) -> Result<TypeId> {
        self.types.resolve(label)
    }

    /// Sets the supertype of `child`.
    pub fn set_supertype(&mut self, child: TypeId, parent: TypeId) -> Result<()> {
        self.types_mut().set_supertype(child, parent)?;
        debug!(
            child = %self.types.label(child),
            parent = %self.types.label(parent),
            "set supertype"
        );
        Ok(())
    }

    /// Marks a type abstract or concrete.
    pub fn set_abstract(&mut self, id: TypeId, is_abstract: bool) -> Result<()> {
        self.types.def(id)?;
        self.types_mut().set_abstract(id, is_abstract)
    }

    /// Declares `role` as a slot of `relation`.
    pub fn relates(&mut self, relation: TypeId, role: TypeId) -> Result<()> {
        self.types_mut().add_relates(relation, role)
    }

    /// Permits instances of `owner` to play `role`.
    pub fn plays(&mut self, owner: TypeId, role: TypeId) -> Result<()> {
        self.types_mut().add_plays(owner, role)
    }

    /// Permits instances of `owner` to carry resources of `resource`.
    pub fn has_resource(&mut self, owner: TypeId, resource: TypeId) -> Result<()> {
        self.types_mut().add_resource(owner, resource)
    }

    // --- Data ---

    /// Returns the resource of `resource_type` holding `value`, creating it
    /// if this exact type and value have not been seen before.
    ///
    /// # Errors
    ///
    /// - `KindMismatch` if `resource_type` is not a resource type
    /// - `AbstractInstantiation` if `resource_type` is abstract
    /// - `TypeMismatch` if the value's data type differs from the declared one
    pub fn put_resource(&mut self, resource_type: TypeId, value: impl Into<Value>) -> Result<InstanceId> {
        let value = value.into();
        let def = self.concrete_type(resource_type, Kind::Resource)?;
        if let Some(expected) = def.data_type() {
            if expected != value.data_type() {
                return Err(Error::type_mismatch(def.label(), expected, value.data_type()));
            }
        }

        if let Some(existing) = self.instances.find_resource(resource_type, &value) {
            return Ok(existing);
        }
        let id = self
            .instances_mut()
            .insert(resource_type, InstanceKind::Resource(value));
        debug!(instance = %id, resource_type = %self.types.label(resource_type), "created resource");
        Ok(id)
    }

    /// Creates an entity of `entity_type`.
    ///
    /// # Errors
    ///
    /// - `KindMismatch` if `entity_type` is not an entity type
    /// - `AbstractInstantiation` if `entity_type` is abstract
    pub fn add_entity(&mut self, entity_type: TypeId) -> Result<InstanceId> {
        self.concrete_type(entity_type, Kind::Entity)?;
        let id = self.instances_mut().insert(entity_type, InstanceKind::Entity);
        debug!(instance = %id, entity_type = %self.types.label(entity_type), "created entity");
        Ok(id)
    }

    /// Creates a relation of `relation_type` with no role players.
    ///
    /// # Errors
    ///
    /// - `KindMismatch` if `relation_type` is not a relation type
    /// - `AbstractInstantiation` if `relation_type` is abstract
    pub fn add_relation(&mut self, relation_type: TypeId) -> Result<InstanceId> {
        self.concrete_type(relation_type, Kind::Relation)?;
        let id = self
            .instances_mut()
            .insert(relation_type, InstanceKind::Relation);
        self.role_players_mut().add_relation(id);
        debug!(instance = %id, relation_type = %self.types.label(relation_type), "created relation");
        Ok(id)
    }

    /// Attaches `resource` to `owner`.
    ///
    /// # Errors
    ///
    /// - `UnknownInstance` if either instance is missing
    /// - `KindMismatch` if `owner` is not an entity or relation, or
    ///   `resource` is not a resource
    /// - `IllegalAttribute` if the owner's type chain does not permit the
    ///   resource's type
    pub fn attach_resource(&mut self, owner: InstanceId, resource: InstanceId) -> Result<()> {
        self.check_attribute(owner, resource)?;
        if self.instances.get(owner).is_some_and(|record| {
            record.resources().any(|attached| attached == resource)
        }) {
            return Ok(());
        }
        self.instances_mut().attach(owner, resource)?;
        debug!(owner = %owner, resource = %resource, "attached resource");
        Ok(())
    }

    /// Adds `player` to `role` in `relation`.
    ///
    /// # Errors
    ///
    /// - `UnknownInstance` if the relation or player is missing
    /// - `KindMismatch` if the arguments have the wrong kinds
    /// - `IllegalRole` if the relation's type chain does not relate `role`
    /// - `AbstractInstantiation` if `role` is abstract
    /// - `IllegalRolePlayer` if the player's type chain may not play `role`
    pub fn put_role_player(&mut self, relation: InstanceId, role: TypeId, player: InstanceId) -> Result<()> {
        self.check_role_player(relation, role, player)?;
        if !self.role_players.has_player(relation, role, player) {
            self.role_players_mut().put(relation, role, player);
            debug!(
                relation = %relation,
                role = %self.types.label(role),
                player = %player,
                "put role player"
            );
        }
        Ok(())
    }

    // --- Rule checks (shared with commit-time validation) ---

    /// Checks that `owner` may carry `resource` under the current schema.
    pub fn check_attribute(&self, owner: InstanceId, resource: InstanceId) -> Result<()> {
        let owner_record = self.instances.validate(owner)?;
        let resource_record = self.instances.validate(resource)?;
        let owner_def = self.types.def(owner_record.type_id())?;
        let resource_def = self.types.def(resource_record.type_id())?;

        if !owner_record.kind().is_thing() {
            return Err(Error::kind_mismatch(
                owner_def.label(),
                Kind::Entity,
                owner_record.kind(),
            ));
        }
        if resource_record.kind() != Kind::Resource {
            return Err(Error::kind_mismatch(
                resource_def.label(),
                Kind::Resource,
                resource_record.kind(),
            ));
        }
        if !self.types.may_have(owner_def.id(), resource_def.id()) {
            return Err(Error::illegal_attribute(owner_def.label(), resource_def.label()));
        }
        Ok(())
    }

    /// Checks that `player` may fill `role` in `relation` under the current
    /// schema.
    pub fn check_role_player(&self, relation: InstanceId, role: TypeId, player: InstanceId) -> Result<()> {
        let relation_record = self.instances.validate(relation)?;
        let relation_def = self.types.def(relation_record.type_id())?;
        if relation_record.kind() != Kind::Relation {
            return Err(Error::kind_mismatch(
                relation_def.label(),
                Kind::Relation,
                relation_record.kind(),
            ));
        }

        let role_def = self.types.def(role)?;
        if role_def.kind() != Kind::Role {
            return Err(Error::kind_mismatch(role_def.label(), Kind::Role, role_def.kind()));
        }
        if !self.types.relates(relation_def.id(), role) {
            return Err(Error::illegal_role(relation_def.label(), role_def.label()));
        }
        if role_def.is_abstract() {
            return Err(Error::abstract_instantiation(role_def.label()));
        }

        let player_record = self.instances.validate(player)?;
        let player_def = self.types.def(player_record.type_id())?;
        if !player_record.kind().is_thing() {
            return Err(Error::kind_mismatch(
                player_def.label(),
                Kind::Entity,
                player_record.kind(),
            ));
        }
        if !self.types.plays(player_def.id(), role) {
            return Err(Error::illegal_role_player(role_def.label(), player_def.label()));
        }
        Ok(())
    }

    /// Mandatory roles of `relation` that have no player yet.
    ///
    /// A role counts as filled when some player sits in it or in one of
    /// its descendant roles.
    pub fn missing_roles(&self, relation: InstanceId) -> Result<Vec<TypeId>> {
        let record = self.instances.validate(relation)?;
        let filled: Vec<TypeId> = self.role_players.filled_roles(relation).collect();
        Ok(self
            .types
            .mandatory_roles(record.type_id())
            .into_iter()
            .filter(|&mandatory| {
                !filled
                    .iter()
                    .any(|&role| self.types.is_subtype_of(role, mandatory))
            })
            .collect())
    }

    fn concrete_type(&self, id: TypeId, kind: Kind) -> Result<&TypeDef> {
        let def = self.types.def(id)?;
        if def.kind() != kind {
            return Err(Error::kind_mismatch(def.label(), kind, def.kind()));
        }
        if def.is_abstract() {
            return Err(Error::abstract_instantiation(def.label()));
        }
        Ok(def)
    }

    // --- Reads ---

    /// Gets an instance by id.
    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id)
    }

    /// Returns the value of a resource instance.
    #[must_use]
    pub fn resource_value(&self, resource: InstanceId) -> Option<&Value> {
        self.instances.get(resource).and_then(Instance::value)
    }

    /// Finds an existing resource without creating it.
    #[must_use]
    pub fn find_resource(&self, resource_type: TypeId, value: &Value) -> Option<InstanceId> {
        self.instances.find_resource(resource_type, value)
    }

    /// The single instance owning `resource`.
    ///
    /// # Errors
    ///
    /// - `UnknownInstance` if the resource does not exist
    /// - `AmbiguousOwner` if more than one instance owns it
    pub fn owner(&self, resource: InstanceId) -> Result<Option<InstanceId>> {
        self.instances.validate(resource)?;
        let mut owners = self.instances.owners(resource);
        let first = owners.next();
        let rest = owners.count();
        if rest > 0 {
            return Err(Error::new(ErrorKind::AmbiguousOwner {
                resource,
                owners: rest + 1,
            }));
        }
        Ok(first)
    }

    /// Every instance owning `resource`, in id order.
    pub fn owners(&self, resource: InstanceId) -> impl Iterator<Item = InstanceId> + '_ {
        self.instances.owners(resource)
    }

    /// Resources attached to `owner`, in id order.
    pub fn resources_of(&self, owner: InstanceId) -> impl Iterator<Item = InstanceId> + '_ {
        self.instances
            .get(owner)
            .into_iter()
            .flat_map(Instance::resources)
    }

    /// Every `(role, player)` pair of a relation.
    pub fn role_players(
        &self,
        relation: InstanceId,
    ) -> impl Iterator<Item = (TypeId, InstanceId)> + '_ {
        self.role_players.role_players(relation)
    }

    /// Every `(relation, role)` in which `player` takes part.
    pub fn relations_of(
        &self,
        player: InstanceId,
    ) -> impl Iterator<Item = (InstanceId, TypeId)> + '_ {
        self.role_players.relations_of(player)
    }

    /// Instances whose exact type is `type_id`.
    pub fn instances_of(&self, type_id: TypeId) -> impl Iterator<Item = InstanceId> + '_ {
        self.instances.instances_of(type_id)
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.instances.count(Kind::Entity)
    }

    /// Returns the number of relations.
    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.instances.count(Kind::Relation)
    }

    /// Returns the number of resources.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.instances.count(Kind::Resource)
    }
}

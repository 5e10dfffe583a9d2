//! Instance storage: allocation, resource deduplication, and attribute edges.
//!
//! The `InstanceStore` is schema-agnostic. It allocates ids, keeps the
//! `(type, value) -> resource` table, and maintains attribute edges in both
//! directions. Schema permissions are enforced one layer up, in
//! [`Graph`](crate::Graph).

use im::{HashMap, OrdSet};
use ontograph_foundation::{Error, InstanceId, Kind, Result, TypeId, Value};

/// What an instance is, plus the payload specific to that kind.
#[derive(Clone, Debug, PartialEq)]
pub enum InstanceKind {
    /// A standalone entity.
    Entity,
    /// A relation; its role players live in the
    /// [`RolePlayerStore`](crate::RolePlayerStore).
    Relation,
    /// A resource holding one value.
    Resource(Value),
}

impl InstanceKind {
    /// Returns the schema kind this instance belongs to.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Entity => Kind::Entity,
            Self::Relation => Kind::Relation,
            Self::Resource(_) => Kind::Resource,
        }
    }
}

/// A concrete data object created against a schema type.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    id: InstanceId,
    type_id: TypeId,
    data: InstanceKind,
    /// Resources attached to this instance.
    resources: OrdSet<InstanceId>,
}

impl Instance {
    /// Returns the instance id.
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Returns the id of the type this instance belongs to.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the schema kind of this instance.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.data.kind()
    }

    /// Returns the value if this is a resource.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match &self.data {
            InstanceKind::Resource(value) => Some(value),
            _ => None,
        }
    }

    /// Resources attached to this instance, in id order.
    pub fn resources(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.resources.iter().copied()
    }
}

/// Holds every instance plus the indices needed to find them again.
#[derive(Clone, Debug, Default)]
pub struct InstanceStore {
    next_index: u64,
    instances: HashMap<InstanceId, Instance>,
    /// Instances grouped by their exact type.
    by_type: HashMap<TypeId, OrdSet<InstanceId>>,
    /// Resource deduplication: exact type and value to resource.
    resource_index: HashMap<(TypeId, Value), InstanceId>,
    /// Reverse attribute edges: resource to the instances carrying it.
    owners: HashMap<InstanceId, OrdSet<InstanceId>>,
}

impl InstanceStore {
    /// Creates a new empty instance store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instance of `type_id`, returning its new id.
    ///
    /// Resources are registered in the deduplication table; callers are
    /// expected to have consulted [`find_resource`](Self::find_resource)
    /// first.
    pub fn insert(&mut self, type_id: TypeId, data: InstanceKind) -> InstanceId {
        let id = InstanceId::new(self.next_index);
        self.next_index += 1;

        if let InstanceKind::Resource(value) = &data {
            self.resource_index.insert((type_id, value.clone()), id);
        }
        self.by_type
            .entry(type_id)
            .or_insert_with(OrdSet::new)
            .insert(id);
        self.instances.insert(
            id,
            Instance {
                id,
                type_id,
                data,
                resources: OrdSet::new(),
            },
        );
        id
    }

    /// Gets an instance by id.
    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(&id)
    }

    /// Gets an instance by id, failing with `UnknownInstance` if absent.
    pub fn validate(&self, id: InstanceId) -> Result<&Instance> {
        self.get(id).ok_or_else(|| Error::unknown_instance(id))
    }

    /// Finds the resource of exactly `type_id` holding `value`.
    #[must_use]
    pub fn find_resource(&self, type_id: TypeId, value: &Value) -> Option<InstanceId> {
        self.resource_index.get(&(type_id, value.clone())).copied()
    }

    /// Attaches `resource` to `owner`.
    ///
    /// Returns `false` if the edge already existed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownInstance` if either instance is missing.
    pub fn attach(&mut self, owner: InstanceId, resource: InstanceId) -> Result<bool> {
        self.validate(resource)?;
        let record = self
            .instances
            .get_mut(&owner)
            .ok_or_else(|| Error::unknown_instance(owner))?;
        if record.resources.insert(resource).is_some() {
            return Ok(false);
        }
        self.owners
            .entry(resource)
            .or_insert_with(OrdSet::new)
            .insert(owner);
        Ok(true)
    }

    /// Instances carrying `resource`, in id order.
    pub fn owners(&self, resource: InstanceId) -> impl Iterator<Item = InstanceId> + '_ {
        self.owners
            .get(&resource)
            .into_iter()
            .flat_map(|owners| owners.iter().copied())
    }

    /// Instances whose exact type is `type_id`, in id order.
    pub fn instances_of(&self, type_id: TypeId) -> impl Iterator<Item = InstanceId> + '_ {
        self.by_type
            .get(&type_id)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    /// Returns the total number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if there are no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Counts instances of one kind.
    #[must_use]
    pub fn count(&self, kind: Kind) -> usize {
        self.instances
            .values()
            .filter(|instance| instance.kind() == kind)
            .count()
    }

    /// Iterates over all instances (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Instance> + '_ {
        self.instances.values()
    }
}

//! Keyspaces and transactions.
//!
//! A [`Keyspace`] publishes one committed [`Graph`] snapshot. A
//! [`Transaction`] works on a copy-on-write clone of that snapshot:
//! 1. Schema and data calls are checked and applied to the working view
//! 2. `commit()` validates the touched instances
//! 3. The working view replaces the published snapshot, or is discarded

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use ontograph_foundation::{
    DataType, Error, ErrorContext, ErrorKind, InstanceId, Result, TypeId, Value,
};
use ontograph_storage::Graph;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::KeyspaceConfig;
use crate::validate::Validator;

// =============================================================================
// Keyspace
// =============================================================================

/// The committed state plus the number of commits that produced it.
#[derive(Clone, Debug, Default)]
struct Published {
    graph: Graph,
    version: u64,
}

/// A named, independently committed graph.
#[derive(Debug)]
pub struct Keyspace {
    name: Arc<str>,
    config: KeyspaceConfig,
    published: RwLock<Published>,
}

impl Keyspace {
    /// Creates an empty keyspace with the default configuration.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::with_config(name, KeyspaceConfig::default())
    }

    /// Creates an empty keyspace with the given configuration.
    #[must_use]
    pub fn with_config(name: impl Into<Arc<str>>, config: KeyspaceConfig) -> Self {
        Self {
            name: name.into(),
            config,
            published: RwLock::new(Published::default()),
        }
    }

    /// Returns the keyspace name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &KeyspaceConfig {
        &self.config
    }

    /// Returns the number of successful commits.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.published.read().version
    }

    /// Returns the committed graph.
    ///
    /// The snapshot is unaffected by later commits.
    #[must_use]
    pub fn snapshot(&self) -> Graph {
        self.published.read().graph.clone()
    }

    /// Opens a transaction over the current snapshot.
    #[must_use]
    pub fn open_transaction(&self) -> Transaction<'_> {
        let published = self.published.read();
        debug!(keyspace = %self.name, version = published.version, "opened transaction");
        Transaction {
            keyspace: self,
            state: TransactionState::Open,
            view: published.graph.clone(),
            base_version: published.version,
            touched: BTreeSet::new(),
            schema_changed: false,
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Lifecycle of a transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransactionState {
    /// Accepting calls.
    Open,
    /// Published to the keyspace.
    Committed,
    /// Discarded.
    Aborted,
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Committed => "committed",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSummary {
    /// Keyspace version after the commit.
    pub version: u64,
    /// Instances validated.
    pub checked: usize,
    /// Declared types in the published graph.
    pub types: usize,
    /// Entities in the published graph.
    pub entities: usize,
    /// Relations in the published graph.
    pub relations: usize,
    /// Resources in the published graph.
    pub resources: usize,
}

/// A batch of schema and data changes against one keyspace.
///
/// Dropping an open transaction aborts it.
#[derive(Debug)]
pub struct Transaction<'k> {
    keyspace: &'k Keyspace,
    state: TransactionState,
    /// Working view, visible to later calls in this transaction.
    view: Graph,
    /// Keyspace version this transaction was opened at.
    base_version: u64,
    /// Instances created or modified in this transaction.
    touched: BTreeSet<InstanceId>,
    /// Set when a schema change could invalidate existing data.
    schema_changed: bool,
}

impl Transaction<'_> {
    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Returns the working view.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.view
    }

    /// Returns the keyspace version this transaction was opened at.
    #[must_use]
    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    // --- Schema ---

    /// Declares a role type.
    pub fn put_role_type(&mut self, label: &str) -> Result<TypeId> {
        self.apply("put_role_type", |graph| graph.put_role_type(label))
    }

    /// Declares a resource type.
    pub fn put_resource_type(&mut self, label: &str, data_type: DataType) -> Result<TypeId> {
        self.apply("put_resource_type", |graph| {
            graph.put_resource_type(label, data_type)
        })
    }

    /// Declares a relation type.
    pub fn put_relation_type(&mut self, label: &str) -> Result<TypeId> {
        self.apply("put_relation_type", |graph| graph.put_relation_type(label))
    }

    /// Declares an entity type.
    pub fn put_entity_type(&mut self, label: &str) -> Result<TypeId> {
        self.apply("put_entity_type", |graph| graph.put_entity_type(label))
    }

    /// Sets the supertype of `child`.
    pub fn set_supertype(&mut self, child: TypeId, parent: TypeId) -> Result<()> {
        self.apply("set_supertype", |graph| graph.set_supertype(child, parent))?;
        self.schema_changed = true;
        Ok(())
    }

    /// Marks a type abstract or concrete.
    pub fn set_abstract(&mut self, id: TypeId, is_abstract: bool) -> Result<()> {
        self.apply("set_abstract", |graph| graph.set_abstract(id, is_abstract))?;
        self.schema_changed = true;
        Ok(())
    }

    /// Declares `role` as a slot of `relation`.
    pub fn relates(&mut self, relation: TypeId, role: TypeId) -> Result<()> {
        self.apply("relates", |graph| graph.relates(relation, role))?;
        self.schema_changed = true;
        Ok(())
    }

    /// Permits instances of `owner` to play `role`.
    pub fn plays(&mut self, owner: TypeId, role: TypeId) -> Result<()> {
        self.apply("plays", |graph| graph.plays(owner, role))
    }

    /// Permits instances of `owner` to carry resources of `resource`.
    pub fn has_resource(&mut self, owner: TypeId, resource: TypeId) -> Result<()> {
        self.apply("has_resource", |graph| graph.has_resource(owner, resource))
    }

    /// Resolves a type label.
    pub fn resolve(&self, label: &str) -> Result<TypeId> {
        self.ensure_open("resolve")?;
        self.view
            .resolve(label)
            .map_err(|err| self.contextualize(err, "resolve"))
    }

    // --- Data ---

    /// Returns the resource of `resource_type` holding `value`, creating it
    /// if needed.
    pub fn put_resource(
        &mut self,
        resource_type: TypeId,
        value: impl Into<Value>,
    ) -> Result<InstanceId> {
        let value = value.into();
        let id = self.apply("put_resource", |graph| {
            graph.put_resource(resource_type, value)
        })?;
        self.touched.insert(id);
        Ok(id)
    }

    /// Creates an entity.
    pub fn add_entity(&mut self, entity_type: TypeId) -> Result<InstanceId> {
        let id = self.apply("add_entity", |graph| graph.add_entity(entity_type))?;
        self.touched.insert(id);
        Ok(id)
    }

    /// Creates a relation with no role players.
    pub fn add_relation(&mut self, relation_type: TypeId) -> Result<InstanceId> {
        let id = self.apply("add_relation", |graph| graph.add_relation(relation_type))?;
        self.touched.insert(id);
        Ok(id)
    }

    /// Attaches `resource` to `owner`.
    pub fn attach_resource(&mut self, owner: InstanceId, resource: InstanceId) -> Result<()> {
        self.apply("attach_resource", |graph| {
            graph.attach_resource(owner, resource)
        })?;
        self.touched.insert(owner);
        Ok(())
    }

    /// Adds `player` to `role` in `relation`.
    pub fn put_role_player(
        &mut self,
        relation: InstanceId,
        role: TypeId,
        player: InstanceId,
    ) -> Result<()> {
        self.apply("put_role_player", |graph| {
            graph.put_role_player(relation, role, player)
        })?;
        self.touched.insert(relation);
        self.touched.insert(player);
        Ok(())
    }

    /// The single owner of `resource`, if any.
    pub fn owner(&self, resource: InstanceId) -> Result<Option<InstanceId>> {
        self.ensure_open("owner")?;
        self.view
            .owner(resource)
            .map_err(|err| self.contextualize(err, "owner"))
    }

    /// Every owner of `resource`, in id order.
    pub fn owners(&self, resource: InstanceId) -> Result<Vec<InstanceId>> {
        self.ensure_open("owners")?;
        Ok(self.view.owners(resource).collect())
    }

    // --- Lifecycle ---

    /// Validates the batch and publishes it to the keyspace.
    ///
    /// # Errors
    ///
    /// - `TransactionClosed` if already committed or aborted
    /// - `Validation` if any relation is incomplete or an earlier call no
    ///   longer satisfies the schema; the transaction is aborted
    /// - `StaleTransaction` if another transaction committed first and the
    ///   keyspace rejects stale commits; the transaction is aborted
    pub fn commit(&mut self) -> Result<CommitSummary> {
        self.ensure_open("commit")?;
        let keyspace = self.keyspace;

        let validator = Validator::new(&keyspace.config);
        let report = if self.schema_changed {
            validator.check_all(&self.view)
        } else {
            validator.check(&self.view, self.touched.iter().copied())
        };
        let checked = report.checked;
        if !report.is_ok() {
            self.discard();
            warn!(
                keyspace = %keyspace.name,
                violations = report.violations.len(),
                truncated = report.truncated,
                "commit rejected"
            );
            return Err(self.contextualize(report.violations.into(), "commit"));
        }

        let mut published = keyspace.published.write();
        if published.version != self.base_version {
            if keyspace.config.reject_stale_commits {
                let current = published.version;
                drop(published);
                self.discard();
                warn!(
                    keyspace = %keyspace.name,
                    opened_at = self.base_version,
                    current,
                    "stale transaction rejected"
                );
                let err = Error::new(ErrorKind::StaleTransaction {
                    opened_at: self.base_version,
                    current,
                });
                return Err(self.contextualize(err, "commit"));
            }
            warn!(
                keyspace = %keyspace.name,
                opened_at = self.base_version,
                current = published.version,
                "stale transaction replaces newer snapshot"
            );
        }

        published.graph = std::mem::take(&mut self.view);
        published.version += 1;
        self.state = TransactionState::Committed;

        let graph = &published.graph;
        let summary = CommitSummary {
            version: published.version,
            checked,
            types: graph.types().len(),
            entities: graph.entity_count(),
            relations: graph.relation_count(),
            resources: graph.resource_count(),
        };
        drop(published);

        info!(
            keyspace = %keyspace.name,
            version = summary.version,
            checked = summary.checked,
            entities = summary.entities,
            relations = summary.relations,
            resources = summary.resources,
            "committed"
        );
        Ok(summary)
    }

    /// Discards the batch without validation.
    ///
    /// # Errors
    ///
    /// Returns `TransactionClosed` if already committed or aborted.
    pub fn abort(&mut self) -> Result<()> {
        self.ensure_open("abort")?;
        self.discard();
        Ok(())
    }

    fn discard(&mut self) {
        self.state = TransactionState::Aborted;
        self.view = Graph::default();
        self.touched.clear();
        debug!(keyspace = %self.keyspace.name, "aborted transaction");
    }

    fn apply<T>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&mut Graph) -> Result<T>,
    ) -> Result<T> {
        self.ensure_open(operation)?;
        match f(&mut self.view) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!(keyspace = %self.keyspace.name, operation, error = %err, "call rejected");
                Err(self.contextualize(err, operation))
            }
        }
    }

    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        if self.state == TransactionState::Open {
            Ok(())
        } else {
            let err = Error::new(ErrorKind::TransactionClosed(self.state.to_string()));
            Err(self.contextualize(err, operation))
        }
    }

    fn contextualize(&self, err: Error, operation: &'static str) -> Error {
        err.with_context(
            ErrorContext::new()
                .with_keyspace(self.keyspace.name())
                .with_operation(operation),
        )
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.state == TransactionState::Open {
            self.discard();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Role-player storage with bidirectional indices.
//!
//! A relation maps each role to the set of instances playing it. The
//! reverse index lets a player find every relation it takes part in
//! without scanning.

use im::{HashMap, OrdMap, OrdSet};
use ontograph_foundation::{InstanceId, TypeId};

/// Stores role-player edges between relations and their players.
///
/// Maintains bidirectional indices for efficient traversal:
/// - Forward: relation -> role -> players
/// - Reverse: player -> (relation, role)
#[derive(Clone, Debug, Default)]
pub struct RolePlayerStore {
    /// Forward index: relation -> role -> set of players.
    forward: HashMap<InstanceId, OrdMap<TypeId, OrdSet<InstanceId>>>,
    /// Reverse index: player -> set of (relation, role).
    reverse: HashMap<InstanceId, OrdSet<(InstanceId, TypeId)>>,
}

impl RolePlayerStore {
    /// Creates a new empty role-player store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a relation with no role players yet.
    pub fn add_relation(&mut self, relation: InstanceId) {
        if !self.forward.contains_key(&relation) {
            self.forward.insert(relation, OrdMap::new());
        }
    }

    /// Adds `player` to the players of `role` in `relation`.
    ///
    /// Returns `false` if the edge already existed (adding is idempotent).
    pub fn put(&mut self, relation: InstanceId, role: TypeId, player: InstanceId) -> bool {
        if self.has_player(relation, role, player) {
            return false;
        }
        self.forward
            .entry(relation)
            .or_insert_with(OrdMap::new)
            .entry(role)
            .or_insert_with(OrdSet::new)
            .insert(player);
        self.reverse
            .entry(player)
            .or_insert_with(OrdSet::new)
            .insert((relation, role));
        true
    }

    /// Players of one role in a relation.
    pub fn players(
        &self,
        relation: InstanceId,
        role: TypeId,
    ) -> impl Iterator<Item = InstanceId> + '_ {
        self.forward
            .get(&relation)
            .and_then(|roles| roles.get(&role))
            .into_iter()
            .flat_map(|players| players.iter().copied())
    }

    /// Every `(role, player)` pair of a relation, ordered by role then player.
    pub fn role_players(
        &self,
        relation: InstanceId,
    ) -> impl Iterator<Item = (TypeId, InstanceId)> + '_ {
        self.forward
            .get(&relation)
            .into_iter()
            .flat_map(|roles| {
                roles
                    .iter()
                    .flat_map(|(role, players)| players.iter().map(move |player| (*role, *player)))
            })
    }

    /// Roles of a relation that have at least one player.
    pub fn filled_roles(&self, relation: InstanceId) -> impl Iterator<Item = TypeId> + '_ {
        self.forward
            .get(&relation)
            .into_iter()
            .flat_map(|roles| {
                roles
                    .iter()
                    .filter(|(_, players)| !players.is_empty())
                    .map(|(role, _)| *role)
            })
    }

    /// Every `(relation, role)` in which `player` takes part (reverse traversal).
    pub fn relations_of(
        &self,
        player: InstanceId,
    ) -> impl Iterator<Item = (InstanceId, TypeId)> + '_ {
        self.reverse
            .get(&player)
            .into_iter()
            .flat_map(|edges| edges.iter().copied())
    }

    /// Checks if a specific edge exists.
    #[must_use]
    pub fn has_player(&self, relation: InstanceId, role: TypeId, player: InstanceId) -> bool {
        self.forward
            .get(&relation)
            .and_then(|roles| roles.get(&role))
            .is_some_and(|players| players.contains(&player))
    }

    /// Returns true if the relation is registered.
    #[must_use]
    pub fn contains(&self, relation: InstanceId) -> bool {
        self.forward.contains_key(&relation)
    }
}

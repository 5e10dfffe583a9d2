//! Commit-time validation.
//!
//! Validation runs against a transaction's working view just before it is
//! published:
//! - every touched relation must have a player for each mandatory role group
//! - attached resources and role players are re-verified against the
//!   current schema, which may have changed since they were added

use ontograph_foundation::{ErrorKind, InstanceId, Kind, Result, ValidationErrors};
use ontograph_storage::Graph;

use crate::config::KeyspaceConfig;

// =============================================================================
// Validation Report
// =============================================================================

/// Result of validating a set of instances.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    /// Instances inspected.
    pub checked: usize,
    /// Violations found, capped by the validator's limit.
    pub violations: ValidationErrors,
    /// Whether collection stopped early because the cap was reached.
    pub truncated: bool,
}

impl ValidationReport {
    /// Returns true if no violations were found.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// Converts the report into a result.
    ///
    /// # Errors
    /// Returns a `Validation` error holding the collected violations.
    pub fn into_result(self) -> Result<usize> {
        if self.violations.is_empty() {
            Ok(self.checked)
        } else {
            Err(self.violations.into())
        }
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Checks commit-time rules against a graph.
#[derive(Clone, Debug)]
pub struct Validator {
    /// Number of violations to collect before stopping.
    limit: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&KeyspaceConfig::default())
    }
}

impl Validator {
    /// Creates a validator honoring the config's report mode and cap.
    #[must_use]
    pub fn new(config: &KeyspaceConfig) -> Self {
        Self {
            limit: config.violation_limit(),
        }
    }

    /// Returns the violation cap.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Validates every instance in `scope`, in the order given.
    ///
    /// Instances missing from the graph are skipped.
    #[must_use]
    pub fn check<I>(&self, graph: &Graph, scope: I) -> ValidationReport
    where
        I: IntoIterator<Item = InstanceId>,
    {
        let mut report = ValidationReport::default();

        for id in scope {
            if graph.instance(id).is_none() {
                continue;
            }
            report.checked += 1;

            for violation in Self::violations_of(graph, id) {
                if report.violations.len() >= self.limit {
                    report.truncated = true;
                    return report;
                }
                report.violations.push(violation);
            }
        }

        report
    }

    /// Validates every instance in the graph, in id order.
    #[must_use]
    pub fn check_all(&self, graph: &Graph) -> ValidationReport {
        let mut ids: Vec<InstanceId> = graph.instances().iter().map(|record| record.id()).collect();
        ids.sort_unstable();
        self.check(graph, ids)
    }

    fn violations_of(graph: &Graph, id: InstanceId) -> Vec<ErrorKind> {
        let mut found = Vec::new();
        let Some(record) = graph.instance(id) else {
            return found;
        };

        if record.kind() == Kind::Relation {
            match graph.missing_roles(id) {
                Ok(missing) => {
                    let relation_type = graph.types().label(record.type_id());
                    found.extend(missing.into_iter().map(|role| ErrorKind::IncompleteRelation {
                        relation: id,
                        relation_type: relation_type.clone(),
                        missing_role: graph.types().label(role),
                    }));
                }
                Err(err) => found.push(err.kind),
            }

            for (role, player) in graph.role_players(id) {
                if let Err(err) = graph.check_role_player(id, role, player) {
                    found.push(err.kind);
                }
            }
        }

        for resource in record.resources() {
            if let Err(err) = graph.check_attribute(id, resource) {
                found.push(err.kind);
            }
        }

        found
    }
}

// =============================================================================
// Tests
// =============================================================================

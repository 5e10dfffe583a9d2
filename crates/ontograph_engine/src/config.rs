//! Configuration for keyspaces and commit validation.

/// How many commit-time violations are collected before a commit is rejected.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ReportMode {
    /// Stop at the first violation.
    First,
    /// Collect every violation, up to the configured cap.
    #[default]
    All,
}

/// Configuration for a keyspace.
///
/// Controls commit validation reporting and stale-transaction handling.
#[derive(Clone, Debug)]
pub struct KeyspaceConfig {
    /// Whether commit validation stops at the first violation.
    pub report_mode: ReportMode,

    /// Cap on the number of violations collected per commit.
    pub max_violations: usize,

    /// Reject commits from transactions opened before another commit.
    /// When false, a stale transaction that passes commit validation
    /// replaces the published snapshot with its own view.
    pub reject_stale_commits: bool,
}

impl Default for KeyspaceConfig {
    fn default() -> Self {
        Self {
            report_mode: ReportMode::All,
            max_violations: 100,
            reject_stale_commits: true,
        }
    }
}

impl KeyspaceConfig {
    /// Creates a configuration that fails fast and rejects stale commits.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            report_mode: ReportMode::First,
            max_violations: 1,
            reject_stale_commits: true,
        }
    }

    /// Creates a configuration that reports everything and lets the last
    /// writer win.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            report_mode: ReportMode::All,
            max_violations: usize::MAX,
            reject_stale_commits: false,
        }
    }

    /// Builder method to set the report mode.
    #[must_use]
    pub fn with_report_mode(mut self, mode: ReportMode) -> Self {
        self.report_mode = mode;
        self
    }

    /// Builder method to set the violation cap.
    #[must_use]
    pub fn with_max_violations(mut self, max: usize) -> Self {
        self.max_violations = max;
        self
    }

    /// Builder method to enable/disable stale-commit rejection.
    #[must_use]
    pub fn with_reject_stale_commits(mut self, reject: bool) -> Self {
        self.reject_stale_commits = reject;
        self
    }

    /// Effective number of violations to collect before stopping.
    #[must_use]
    pub fn violation_limit(&self) -> usize {
        match self.report_mode {
            ReportMode::First => 1,
            ReportMode::All => self.max_violations.max(1),
        }
    }
}

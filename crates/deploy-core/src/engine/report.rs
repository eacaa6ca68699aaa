//! Report types for apply and check operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a convergence check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Every rule's target matches its source
    Converged,
    /// Some expected files are absent from their targets
    Missing,
    /// Some deployed files differ from their source in content or mode
    Drifted,
    /// A source locator could not be resolved
    Broken,
}

/// A deployed file that is missing or has diverged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftItem {
    /// The rule this drift belongs to
    pub rule_id: String,
    /// The affected target file path
    pub file: String,
    /// Human-readable description of the divergence
    pub description: String,
}

/// Report from a convergence check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Overall status of the check
    pub status: CheckStatus,
    /// Files that have diverged from their source
    pub drifted: Vec<DriftItem>,
    /// Files that are absent from their targets
    pub missing: Vec<DriftItem>,
    /// Additional messages about the check
    pub messages: Vec<String>,
}

impl CheckReport {
    /// A converged report with no issues
    pub fn converged() -> Self {
        Self {
            status: CheckStatus::Converged,
            drifted: Vec::new(),
            missing: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// A report with missing files
    pub fn with_missing(missing: Vec<DriftItem>) -> Self {
        Self {
            status: CheckStatus::Missing,
            drifted: Vec::new(),
            missing,
            messages: Vec::new(),
        }
    }

    /// A report with drifted files
    pub fn with_drifted(drifted: Vec<DriftItem>) -> Self {
        Self {
            status: CheckStatus::Drifted,
            drifted,
            missing: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// A report for an unresolvable source
    pub fn broken(message: String) -> Self {
        Self {
            status: CheckStatus::Broken,
            drifted: Vec::new(),
            missing: Vec::new(),
            messages: vec![message],
        }
    }

    /// Merge two reports, combining their issues
    ///
    /// The resulting status is the worst of the two:
    /// Broken > Drifted > Missing > Converged
    pub fn merge(mut self, other: CheckReport) -> Self {
        self.drifted.extend(other.drifted);
        self.missing.extend(other.missing);
        self.messages.extend(other.messages);

        self.status = match (self.status, other.status) {
            (CheckStatus::Broken, _) | (_, CheckStatus::Broken) => CheckStatus::Broken,
            (CheckStatus::Drifted, _) | (_, CheckStatus::Drifted) => CheckStatus::Drifted,
            (CheckStatus::Missing, _) | (_, CheckStatus::Missing) => CheckStatus::Missing,
            (CheckStatus::Converged, CheckStatus::Converged) => CheckStatus::Converged,
        };

        self
    }
}

/// Report from an apply operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Whether every rule applied without error
    pub success: bool,
    /// Actions taken, in rule order
    pub actions: Vec<String>,
    /// Errors encountered, one per failed rule
    pub errors: Vec<String>,
    /// When the pass finished
    pub finished_at: DateTime<Utc>,
}

impl ApplyReport {
    /// Create an empty successful report
    pub fn success() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            errors: Vec::new(),
            finished_at: Utc::now(),
        }
    }

    /// Add an action to the report
    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }

    /// Whether the pass changed anything on disk
    ///
    /// True when every action was a skip ("unchanged" or "[dry-run]").
    pub fn is_no_op(&self) -> bool {
        self.actions
            .iter()
            .all(|a| a.starts_with("unchanged") || a.starts_with("[dry-run]"))
    }
}

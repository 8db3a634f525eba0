//! Core types for declarative resource management

use serde::{Deserialize, Serialize};

/// Result of running a single resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ApplyResult {
    /// Actual state already matched the desired state
    NoChange,
    /// The resource changed the system
    Changed,
    /// Run failed
    Failed { error: String },
    /// Run was skipped (an earlier failure with fail-fast)
    Skipped { reason: String },
}

impl ApplyResult {
    /// Map the changed flag returned by [`crate::Resource::run`]
    pub fn from_changed(changed: bool) -> Self {
        if changed { Self::Changed } else { Self::NoChange }
    }

    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the result represents a change
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Outcome of one resource within an execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub resource_id: String,
    pub resource_type: String,
    pub description: String,
    #[serde(flatten)]
    pub result: ApplyResult,
}

/// Summary of execution results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub changed: usize,
    pub no_change: usize,
    pub failed: usize,
    pub skipped: usize,
    pub outcomes: Vec<Outcome>,
}

impl ExecuteSummary {
    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Whether any resource changed the system
    pub fn has_changes(&self) -> bool {
        self.changed > 0
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.changed + self.no_change + self.failed + self.skipped
    }

    /// Record an outcome in the summary
    pub fn add_outcome(&mut self, outcome: Outcome) {
        match outcome.result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Changed => self.changed += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Stop at the first failed resource, marking the rest as skipped
    pub fail_fast: bool,
}

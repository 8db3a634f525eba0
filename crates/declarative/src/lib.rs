//! # Declarative
//!
//! The contract shared by every steward resource module.
//!
//! A resource holds a described desired state. Running it probes the
//! actual state of the system, applies the minimal change needed to
//! converge, and reports whether anything changed. Correctness is
//! defined by idempotence: a second run with the same desired state
//! reports no change.
//!
//! ## Core Concepts
//!
//! - **Resource**: Something with state that can be converged (files, packages, keys)
//! - **ApplyResult**: What a single run did (changed, no change, failed)
//! - **ExecutionPlan**: An ordered list of resources, filterable by target
//! - **Executor**: Runs a plan sequentially and summarizes the outcomes
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{ExecuteOptions, ExecutionPlan, execute_simple};
//!
//! let mut plan = ExecutionPlan::new();
//! plan.push(Box::new(some_resource));
//!
//! let summary = execute_simple(&plan, &ExecuteOptions::default());
//! println!("{} changed, {} failed", summary.changed, summary.failed);
//! ```
//!
//! Resources run strictly one after another. There is no dependency
//! graph, no parallelism and no rollback across resources; drivers may
//! re-run a plan and rely on idempotence.

pub mod executor;
pub mod planner;
pub mod progress;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use executor::{execute, execute_simple};
pub use planner::ExecutionPlan;
pub use progress::{NoProgress, ProgressCallback};
pub use resource::{BoxedResource, Resource};
pub use types::{ApplyResult, ExecuteOptions, ExecuteSummary, Outcome};

//! Progress callback trait
//!
//! Lets drivers observe execution without the declarative crate
//! depending on any particular output implementation.

use crate::types::ApplyResult;

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback {
    /// Called once before the first resource runs
    fn on_start(&mut self, count: usize);

    /// Called when starting to run a single resource
    fn on_resource_start(&mut self, id: &str, description: &str);

    /// Called when a resource run completes
    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult);

    /// Called after the last resource
    fn on_complete(&mut self);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&mut self, _count: usize) {}
    fn on_resource_start(&mut self, _id: &str, _description: &str) {}
    fn on_resource_complete(&mut self, _id: &str, _result: &ApplyResult) {}
    fn on_complete(&mut self) {}
}

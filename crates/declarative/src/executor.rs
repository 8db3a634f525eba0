//! Execution engine - runs resources one after another

use crate::planner::ExecutionPlan;
use crate::progress::{NoProgress, ProgressCallback};
use crate::resource::Resource;
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary, Outcome};

/// Execute a plan with the given options and progress callback
///
/// Resources run sequentially in plan order. A failing resource is
/// recorded as [`ApplyResult::Failed`]; the remaining resources still
/// run unless `opts.fail_fast` is set, in which case they are recorded
/// as skipped. Nothing is retried or rolled back.
pub fn execute<P: ProgressCallback>(
    plan: &ExecutionPlan,
    opts: &ExecuteOptions,
    progress: &mut P,
) -> ExecuteSummary {
    let mut summary = ExecuteSummary::default();
    let mut aborted = false;

    progress.on_start(plan.len());

    for resource in &plan.resources {
        let result = if aborted {
            ApplyResult::Skipped {
                reason: "earlier resource failed".to_string(),
            }
        } else {
            progress.on_resource_start(&resource.id(), &resource.description());
            let result = run_resource(resource.as_ref());
            progress.on_resource_complete(&resource.id(), &result);
            result
        };

        if opts.fail_fast && !result.is_success() {
            aborted = true;
        }

        summary.add_outcome(Outcome {
            resource_id: resource.id(),
            resource_type: resource.resource_type().to_string(),
            description: resource.description(),
            result,
        });
    }

    progress.on_complete();
    summary
}

/// Run a single resource
fn run_resource(resource: &dyn Resource) -> ApplyResult {
    match resource.run() {
        Ok(changed) => ApplyResult::from_changed(changed),
        Err(e) => ApplyResult::Failed {
            error: format!("{e:#}"),
        },
    }
}

/// Simple execution without callbacks
pub fn execute_simple(plan: &ExecutionPlan, opts: &ExecuteOptions) -> ExecuteSummary {
    execute(plan, opts, &mut NoProgress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use std::cell::Cell;

    #[derive(Debug)]
    struct TestResource {
        id: String,
        changes: bool,
        fails: bool,
        runs: Cell<usize>,
    }

    impl TestResource {
        fn new(id: &str, changes: bool, fails: bool) -> Self {
            Self {
                id: id.to_string(),
                changes,
                fails,
                runs: Cell::new(0),
            }
        }
    }

    impl Resource for TestResource {
        fn id(&self) -> String {
            self.id.clone()
        }

        fn description(&self) -> String {
            format!("Test resource {}", self.id)
        }

        fn resource_type(&self) -> &'static str {
            "test"
        }

        fn run(&self) -> Result<bool> {
            self.runs.set(self.runs.get() + 1);
            if self.fails {
                bail!("{} failed", self.id);
            }
            Ok(self.changes)
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<String>,
        completed: Vec<(String, ApplyResult)>,
    }

    impl ProgressCallback for Recorder {
        fn on_start(&mut self, _count: usize) {}

        fn on_resource_start(&mut self, id: &str, _description: &str) {
            self.started.push(id.to_string());
        }

        fn on_resource_complete(&mut self, id: &str, result: &ApplyResult) {
            self.completed.push((id.to_string(), result.clone()));
        }

        fn on_complete(&mut self) {}
    }

    #[test]
    fn test_execute_empty_plan() {
        let summary = execute_simple(&ExecutionPlan::new(), &ExecuteOptions::default());
        assert_eq!(summary.total(), 0);
        assert!(summary.is_success());
    }

    #[test]
    fn test_execute_counts_changes() {
        let mut plan = ExecutionPlan::new();
        plan.push(Box::new(TestResource::new("a", true, false)));
        plan.push(Box::new(TestResource::new("b", false, false)));

        let summary = execute_simple(&plan, &ExecuteOptions::default());

        assert_eq!(summary.changed, 1);
        assert_eq!(summary.no_change, 1);
        assert!(summary.has_changes());
        assert_eq!(summary.outcomes[0].result, ApplyResult::Changed);
    }

    #[test]
    fn test_execute_continues_after_failure() {
        let mut plan = ExecutionPlan::new();
        plan.push(Box::new(TestResource::new("a", false, true)));
        plan.push(Box::new(TestResource::new("b", true, false)));

        let mut recorder = Recorder::default();
        let summary = execute(&plan, &ExecuteOptions::default(), &mut recorder);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.changed, 1);
        assert!(!summary.is_success());
        assert_eq!(recorder.started, vec!["a", "b"]);
        match &summary.outcomes[0].result {
            ApplyResult::Failed { error } => assert!(error.contains("a failed")),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_execute_fail_fast_skips_rest() {
        let mut plan = ExecutionPlan::new();
        plan.push(Box::new(TestResource::new("a", false, true)));
        plan.push(Box::new(TestResource::new("b", true, false)));

        let opts = ExecuteOptions { fail_fast: true };
        let mut recorder = Recorder::default();
        let summary = execute(&plan, &opts, &mut recorder);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.changed, 0);
        assert_eq!(recorder.completed.len(), 1);
    }

    #[test]
    fn test_outcome_serializes_flat() {
        let outcome = Outcome {
            resource_id: "htop".into(),
            resource_type: "package".into(),
            description: "Install htop".into(),
            result: ApplyResult::Changed,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["result"], "changed");
        assert_eq!(json["resource_id"], "htop");
    }
}

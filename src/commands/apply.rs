//! `steward apply` - converge every selected resource once

use anyhow::Result;
use colored::Colorize;
use declarative::{ApplyResult, ExecuteOptions, ExecuteSummary, NoProgress, ProgressCallback};

use crate::Context;
use crate::cli::ApplyArgs;
use crate::commands::load_plan;
use crate::ui;

/// Prints a line per resource as it completes
struct TerminalProgress {
    quiet: bool,
    description: String,
}

impl ProgressCallback for TerminalProgress {
    fn on_start(&mut self, count: usize) {
        if !self.quiet {
            ui::info(&format!("Applying {count} resources"));
        }
    }

    fn on_resource_start(&mut self, id: &str, description: &str) {
        log::debug!("Running {id}");
        self.description = description.to_string();
    }

    fn on_resource_complete(&mut self, id: &str, result: &ApplyResult) {
        let show = !self.quiet || !result.is_success();
        if show {
            ui::resource_line(id, &self.description, result);
        }
    }

    fn on_complete(&mut self) {}
}

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let (path, plan) = load_plan(&args.manifest)?;

    if plan.is_empty() {
        if !args.json {
            ui::warn(&format!("No resources selected in {}", path.display()));
        }
        return Ok(());
    }

    let opts = ExecuteOptions {
        fail_fast: args.fail_fast,
    };

    let summary = if args.json {
        let summary = declarative::execute(&plan, &opts, &mut NoProgress);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        summary
    } else {
        ui::header(&format!("steward apply {}", path.display()));
        let mut progress = TerminalProgress {
            quiet: ctx.quiet,
            description: String::new(),
        };
        let summary = declarative::execute(&plan, &opts, &mut progress);
        print_summary(&summary);
        summary
    };

    if !summary.is_success() {
        anyhow::bail!(
            "{} of {} resources failed",
            summary.failed,
            summary.total()
        );
    }
    Ok(())
}

/// Print final summary
fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        ui::success(&format!(
            "{} changed, {} ok",
            summary.changed, summary.no_change
        ));
        return;
    }

    ui::error(&format!(
        "{} changed, {} ok, {} {}",
        summary.changed,
        summary.no_change,
        summary.failed,
        "failed".red()
    ));
    if summary.skipped > 0 {
        ui::dim(&format!(
            "{} resources skipped after the first failure",
            summary.skipped
        ));
    }
}

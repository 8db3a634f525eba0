//! `steward list` - show what a manifest declares without running it

use anyhow::Result;

use crate::Context;
use crate::cli::ListArgs;
use crate::commands::load_plan;
use crate::ui;

pub fn run(ctx: &Context, args: ListArgs) -> Result<()> {
    let (path, plan) = load_plan(&args.manifest)?;

    if !ctx.quiet {
        ui::header(&path.display().to_string());
    }

    if plan.is_empty() {
        ui::dim("no resources");
        return Ok(());
    }

    for resource in &plan.resources {
        ui::kv(resource.resource_type(), &resource.description());
    }
    Ok(())
}

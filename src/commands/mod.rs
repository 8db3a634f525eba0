pub mod apply;
pub mod list;

use anyhow::Result;
use declarative::ExecutionPlan;
use std::path::{Path, PathBuf};

use crate::cli::ManifestArgs;
use crate::manifest::Manifest;
use crate::paths;

/// Resolve, load and filter the manifest named by the arguments
pub fn load_plan(args: &ManifestArgs) -> Result<(PathBuf, ExecutionPlan)> {
    let path = paths::manifest_path(args.manifest.as_deref())?;
    log::debug!("Loading manifest {}", path.display());

    let manifest = Manifest::load(&path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let plan = manifest
        .plan(base_dir)?
        .filter_by_target(args.target.as_deref());
    Ok((path, plan))
}

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "steward")]
#[command(author = "steward contributors")]
#[command(version)]
#[command(about = "Converge files, packages, keys and apt repositories to a declared state", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run every selected resource once, in manifest order
    Apply(ApplyArgs),

    /// Show the resources a manifest declares
    List(ListArgs),
}

#[derive(Args)]
pub struct ManifestArgs {
    /// Manifest to read (default: $STEWARD_MANIFEST, then <config dir>/manifest.toml)
    pub manifest: Option<PathBuf>,

    /// Only resources matching a target: type, type.name or an alias (files, packages, apt)
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Stop at the first failed resource
    #[arg(long)]
    pub fail_fast: bool,

    /// Print outcomes as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

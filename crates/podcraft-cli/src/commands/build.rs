//! `podcraft build` — Assemble every image of the given projects.

use clap::Args;
use podcraft_common::types::Operation;

use super::ProjectArgs;

/// Arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Projects to build.
    #[command(flatten)]
    pub projects: ProjectArgs,

    /// Package each image as a compressed .aci archive.
    #[arg(long)]
    pub zip: bool,

    /// Clean the project before building.
    #[arg(long)]
    pub clean: bool,

    /// Rebuild images even when they are up to date.
    #[arg(long)]
    pub force_update: bool,
}

/// Executes the `build` command.
///
/// # Errors
///
/// Returns an error if a project cannot be loaded or an image fails to build.
pub fn execute(args: &BuildArgs) -> anyhow::Result<()> {
    tracing::info!(paths = ?args.projects.paths, zip = args.zip, "building");
    super::run_projects(&args.projects, Operation::Build, |config| {
        config.zip = args.zip;
        config.clean = args.clean;
        config.force_update = args.force_update;
    })
}

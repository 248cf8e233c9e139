//! `podcraft clean` — Remove build output.

use clap::Args;
use podcraft_common::types::Operation;

use super::ProjectArgs;

/// Arguments for the `clean` command.
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Projects to clean.
    #[command(flatten)]
    pub projects: ProjectArgs,
}

/// Executes the `clean` command.
///
/// # Errors
///
/// Returns an error if a project cannot be loaded or its output cannot be
/// removed.
pub fn execute(args: &CleanArgs) -> anyhow::Result<()> {
    super::run_projects(&args.projects, Operation::Clean, |_| {})
}

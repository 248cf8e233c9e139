//! `podcraft test` — Run image tests against built images.

use clap::Args;
use podcraft_common::types::Operation;

use super::ProjectArgs;

/// Arguments for the `test` command.
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Projects to test.
    #[command(flatten)]
    pub projects: ProjectArgs,
}

/// Executes the `test` command.
///
/// # Errors
///
/// Returns an error if a project cannot be loaded or a test fails.
pub fn execute(args: &TestArgs) -> anyhow::Result<()> {
    super::run_projects(&args.projects, Operation::Test, |_| {})
}

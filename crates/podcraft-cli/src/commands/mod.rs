//! CLI command definitions and dispatch.

pub mod build;
pub mod clean;
pub mod test;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::bail;
use clap::{ArgAction, Args, Parser, Subcommand};
use podcraft_common::config::BuildArgs as BuildConfig;
use podcraft_common::types::Operation;

use crate::logging::{ColorMode, LogConfig, LogFormat};
use crate::output;
use crate::project::Project;

/// podcraft — Build, clean, and test pods of container images.
#[derive(Parser, Debug)]
#[command(name = "podcraft", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// When to color log output.
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

impl Cli {
    /// Returns the logging options selected on the command line.
    #[must_use]
    pub const fn log_config(&self) -> LogConfig {
        LogConfig {
            level: LogConfig::level_from_flags(self.verbose, self.quiet),
            format: self.log_format,
            color: self.color,
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build every image of the given pods or image projects.
    Build(build::BuildArgs),
    /// Remove build output of the given projects.
    Clean(clean::CleanArgs),
    /// Run the tests of the given projects against their built images.
    Test(test::TestArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project directories holding a pod-manifest.yml or aci-manifest.yml.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Output directory (only with a single project; defaults to <path>/target).
    #[arg(long, env = "PODCRAFT_TARGET_PATH")]
    pub target_path: Option<PathBuf>,

    /// Continue with the remaining projects after a project fails.
    #[arg(long)]
    pub keep_going: bool,
}

impl ProjectArgs {
    /// Builds the configuration for the project at `path`.
    fn config_for(&self, path: &Path, configure: impl Fn(&mut BuildConfig)) -> BuildConfig {
        let mut config = BuildConfig {
            target_path: self.target_path.clone(),
            ..BuildConfig::new(path)
        };
        configure(&mut config);
        config
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Build(args) => build::execute(&args),
        Command::Clean(args) => clean::execute(&args),
        Command::Test(args) => test::execute(&args),
    }
}

/// Runs `operation` on every project, in order.
///
/// Stops at the first failing project unless `keep_going` is set, in which
/// case every project runs and the failures are reported together.
fn run_projects(
    projects: &ProjectArgs,
    operation: Operation,
    configure: impl Fn(&mut BuildConfig),
) -> anyhow::Result<()> {
    if projects.target_path.is_some() && projects.paths.len() > 1 {
        bail!("--target-path can only be used with a single project");
    }

    let mut failed = Vec::new();
    for path in &projects.paths {
        let config = projects.config_for(path, &configure);
        if let Err(err) = run_project(path, config, operation) {
            if !projects.keep_going {
                return Err(err);
            }
            tracing::error!(path = %path.display(), error = %format!("{err:#}"), "project failed");
            failed.push(path.display().to_string());
        }
    }

    if !failed.is_empty() {
        bail!(
            "{operation} failed for {} of {} projects: {}",
            failed.len(),
            projects.paths.len(),
            failed.join(", ")
        );
    }
    Ok(())
}

fn run_project(path: &Path, config: BuildConfig, operation: Operation) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut project = Project::detect(path, config)?;
    tracing::info!(project = %project.name(), %operation, "running");
    project.run(operation)?;

    let count = project.image_count();
    println!(
        "{operation} {}: {count} {} in {}",
        project.name(),
        output::images(count),
        output::format_duration(started.elapsed())
    );
    Ok(())
}

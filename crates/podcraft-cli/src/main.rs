//! # podcraft
//!
//! Builds, cleans, and tests pods of application container images.
//! Each path given on the command line is a pod or a single image project.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod commands;
mod logging;
mod output;
mod project;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_config())?;
    commands::execute(cli)
}

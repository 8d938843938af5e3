//! Manage end-to-end fixtures from the command line.
//!
//! Useful when iterating on a single scenario by hand instead of running the
//! whole suite.
//!
//! Usage:
//!   e2e-fixture registry up
//!   e2e-fixture registry down
//!   e2e-fixture run <command> --env-file <path>
//!
//! Environment variables:
//! - E2E_HOST_PATH: host path containing `testdata/auth` (default: cwd)
//! - GITHUB_ACTIONS_BINARY: binary under test (default: ../bin/github-actions)
//! - RUST_LOG: log filter (default: info)

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use e2e_support::{Error, remove_local_registry, run_actions_command, setup_local_registry};
use tracing::error;

/// End-to-end fixtures for the github-actions binary
#[derive(Parser)]
#[command(name = "e2e-fixture")]
#[command(about = "Manage end-to-end fixtures for the github-actions binary", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or stop the local registry container
    #[command(subcommand)]
    Registry(RegistryCommands),

    /// Run the binary under test with an env file applied
    Run {
        /// Subcommand passed to the binary under test
        command: String,

        /// Env file with KEY=VALUE lines, relative to the working directory
        #[arg(long, value_name = "PATH")]
        env_file: PathBuf,
    },
}

#[derive(Subcommand)]
enum RegistryCommands {
    /// Replace any existing registry container with a fresh one
    Up,

    /// Force-remove the registry container
    Down,
}

fn main() {
    e2e_support::init_logging();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Registry(RegistryCommands::Up) => {
            setup_local_registry().context("Failed to start registry")
        }
        Commands::Registry(RegistryCommands::Down) => {
            remove_local_registry().context("Failed to stop registry")
        }
        Commands::Run { command, env_file } => {
            let context = format!("Failed to run '{command}'");
            run_actions_command(command, env_file).context(context)
        }
    };

    if let Err(e) = result {
        error!("Error: {e:#}");
        process::exit(exit_code(&e));
    }
}

// Mirror the exit code of a failed binary under test, so scripts can tell
// failures of the binary from failures of the fixture.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(Error::CommandFailed { outcome, .. }) => outcome.code().unwrap_or(1),
        _ => 1,
    }
}

#[cfg(test)]
#[path = "e2e_fixture_tests.rs"]
mod tests;

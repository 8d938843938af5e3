//! Fixtures for end-to-end tests of the `github-actions` binary.
//!
//! The end-to-end suite exercises a pre-built binary against a local container
//! registry. This crate provides the pieces around it:
//!
//! - [`env_file`]: parse `KEY=VALUE` env files
//! - [`env_vars`]: apply and revert those variables on the current process
//! - [`registry`]: start and stop the `registry:2` fixture container
//! - [`binary`]: locate the binary under test
//! - [`runner`]: run the binary with an env file applied
//!
//! All operations are synchronous and block until external processes exit.
//! The process environment is global, so tests using these fixtures must run
//! one at a time (`#[serial]`, or `--test-threads=1`).
//!
//! # Examples
//!
//! ```no_run
//! use e2e_support::{RegistryFixture, run_actions_command};
//!
//! # fn main() -> Result<(), e2e_support::Error> {
//! let registry = RegistryFixture::default().start()?;
//! run_actions_command("login", "testdata/login_test.env")?;
//! registry.stop()?;
//! # Ok(())
//! # }
//! ```

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

pub mod binary;
pub mod env_file;
pub mod env_vars;
pub mod errors;
pub mod process;
pub mod registry;
pub mod runner;

#[cfg(test)]
mod testing;

pub use binary::{ACTIONS_BINARY_ENV, get_actions_binary_path};
pub use env_file::{EnvVar, parse_env_file, parse_env_str};
pub use env_vars::{EnvVarGuard, remove_env_vars, setup_env_vars};
pub use errors::{E2eResult, Error};
pub use process::{CommandExecutor, CommandOutcome, CommandSpec, StdioMode, SystemCommandExecutor};
pub use registry::{
    E2E_HOST_PATH_ENV, LocalRegistry, REGISTRY_CONTAINER_NAME, REGISTRY_IMAGE, RegistryFixture,
    get_e2e_host_path, remove_local_registry, setup_local_registry,
};
pub use runner::{ActionsRunner, run_actions_command};

/// Initialize logging for end-to-end tests and the fixture binary.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless, so every test may call it.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

pub(crate) fn current_dir() -> E2eResult<PathBuf> {
    let action = "determine the current working directory";
    env::current_dir().map_err(|e| Error::io(action, e))
}

// Overrides that are set but empty count as unset.
pub(crate) fn env_override(name: &str) -> Option<OsString> {
    env::var_os(name).filter(|value| !value.is_empty())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

//! Running the binary under test.

use std::path::Path;

use tracing::info;

use crate::binary::get_actions_binary_path;
use crate::env_file::parse_env_file;
use crate::env_vars::EnvVarGuard;
use crate::errors::{E2eResult, Error};
use crate::process::{CommandExecutor, CommandSpec, SystemCommandExecutor};

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

/// Run `<binary> <command>` with the variables of `env_file` applied.
///
/// Uses the real binary located by [`get_actions_binary_path`].
pub fn run_actions_command(command: &str, env_file: impl AsRef<Path>) -> E2eResult<()> {
    ActionsRunner::default().run(command, env_file)
}

/// Runs the binary under test through a [`CommandExecutor`].
#[derive(Debug, Clone)]
pub struct ActionsRunner<E = SystemCommandExecutor> {
    executor: E,
}

impl Default for ActionsRunner<SystemCommandExecutor> {
    fn default() -> Self {
        Self::new(SystemCommandExecutor)
    }
}

impl<E: CommandExecutor> ActionsRunner<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Parse `env_file`, apply its variables, then run the binary with
    /// `command` as its only argument and inherited stdout/stderr.
    ///
    /// The first failing step ends the run. Once applied, the variables are
    /// removed again on every path out of this function.
    pub fn run(&self, command: &str, env_file: impl AsRef<Path>) -> E2eResult<()> {
        let env_file = env_file.as_ref();
        let vars = parse_env_file(env_file)?;
        let _env = EnvVarGuard::apply(vars)?;

        let binary = get_actions_binary_path()?;
        info!(
            binary = %binary.display(),
            command = command,
            env_file = %env_file.display(),
            "Running github-actions command"
        );

        // Output is inherited so the binary's logs show up in the test output.
        let spec = CommandSpec::new(&binary).arg(command);
        let outcome = self.executor.run(&spec)?;

        if !outcome.success() {
            return Err(Error::CommandFailed {
                program: spec.program_name(),
                outcome,
            });
        }

        info!(command = command, "github-actions command succeeded");
        Ok(())
    }
}

//! External process execution.
//!
//! Every external collaborator (the `docker` CLI and the binary under test) is
//! reached through [`CommandExecutor`]. The fixtures only ever see a program
//! name, its arguments, how its output streams are wired and how it exited.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::errors::{E2eResult, Error};

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;

/// How the standard output and error streams of a child are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// The child writes straight to this process's stdout/stderr.
    Inherit,
    /// The child's output is discarded.
    Null,
}

/// A fully described invocation of an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub stdio: StdioMode,
}

impl CommandSpec {
    /// Create a spec with no arguments whose output is inherited.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            stdio: StdioMode::Inherit,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args = args.into_iter().map(|a| a.as_ref().to_os_string());
        self.args.extend(args);
        self
    }

    pub fn stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = stdio;
        self
    }

    /// The program name as displayed in logs and errors.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// How a finished child process exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    code: Option<i32>,
}

impl CommandOutcome {
    /// Build an outcome from an exit code. `None` means the process was
    /// terminated by a signal.
    pub fn from_code(code: Option<i32>) -> Self {
        Self { code }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Runs external programs to completion.
///
/// Implementations block until the child exits. There is no timeout.
pub trait CommandExecutor {
    /// Run the command and report how it exited.
    ///
    /// An `Err` means the program could not be started; a program that ran
    /// and failed is reported through the returned [`CommandOutcome`].
    fn execute(&self, spec: &CommandSpec) -> io::Result<CommandOutcome>;

    /// Like [`execute`](Self::execute), but a program that cannot be started
    /// is reported as [`Error::Spawn`].
    fn run(&self, spec: &CommandSpec) -> E2eResult<CommandOutcome> {
        self.execute(spec).map_err(|source| Error::Spawn {
            program: spec.program_name(),
            source,
        })
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for &T {
    fn execute(&self, spec: &CommandSpec) -> io::Result<CommandOutcome> {
        (**self).execute(spec)
    }
}

/// Executes commands as real child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, spec: &CommandSpec) -> io::Result<CommandOutcome> {
        debug!(
            program = %spec.program_name(),
            args = ?spec.args,
            stdio = ?spec.stdio,
            "Running external command"
        );

        let (stdout, stderr) = match spec.stdio {
            StdioMode::Inherit => (Stdio::inherit(), Stdio::inherit()),
            StdioMode::Null => (Stdio::null(), Stdio::null()),
        };

        let status = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()?;

        Ok(CommandOutcome::from_code(status.code()))
    }
}

//! Error types for the end-to-end fixtures.
//!
//! Every fixture operation returns the first error it hits as a value. Nothing
//! in this crate retries, and nothing aborts the test process on its own.

use std::io;

use thiserror::Error;

use crate::process::CommandOutcome;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while preparing or running an end-to-end test.
#[derive(Error, Debug)]
pub enum Error {
    /// A file or path could not be resolved or opened.
    ///
    /// Covers the current working directory lookup as well as opening the
    /// env file.
    #[error("Failed to {action}")]
    Io {
        action: String,
        #[source]
        source: io::Error,
    },

    /// Reading a line from an env file failed, e.g. because it is not UTF-8.
    #[error("Failed to read env file at line {line_number}")]
    Scan {
        line_number: usize,
        #[source]
        source: io::Error,
    },

    /// An env file line has no `=` delimiter.
    #[error("Malformed env file line {line_number}: expected KEY=VALUE, got '{line}'")]
    MalformedLine { line_number: usize, line: String },

    /// A variable could not be set on the process environment.
    #[error("Failed to set environment variable '{key}': {reason}")]
    EnvSet { key: String, reason: String },

    /// A variable could not be removed from the process environment.
    #[error("Failed to unset environment variable '{key}': {reason}")]
    EnvUnset { key: String, reason: String },

    /// An external program could not be started at all.
    #[error("Failed to spawn '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// `docker run` for the registry fixture did not succeed.
    #[error("Failed to start registry container '{container}': {outcome}")]
    ContainerStart {
        container: String,
        outcome: CommandOutcome,
    },

    /// `docker rm -f` for the registry fixture did not succeed.
    ///
    /// This is expected when the container does not exist, which is why the
    /// pre-setup removal ignores it.
    #[error("Failed to remove registry container '{container}': {outcome}")]
    ContainerRemove {
        container: String,
        outcome: CommandOutcome,
    },

    /// The binary under test ran but reported failure.
    #[error("Command '{program}' failed: {outcome}")]
    CommandFailed {
        program: String,
        outcome: CommandOutcome,
    },
}

impl Error {
    pub(crate) fn io(action: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            action: action.into(),
            source,
        }
    }
}

/// Result type alias for fixture operations.
pub type E2eResult<T> = Result<T, Error>;

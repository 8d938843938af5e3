//! Location of the `github-actions` binary under test.
//!
//! The binary is built outside of these tests. CI points at it with
//! `GITHUB_ACTIONS_BINARY`; locally it is expected at `../bin/github-actions`
//! relative to the directory the tests run in.

use std::path::PathBuf;

use crate::errors::E2eResult;
use crate::{current_dir, env_override};

#[cfg(test)]
#[path = "binary_tests.rs"]
mod tests;

/// Environment variable overriding the path of the binary under test.
pub const ACTIONS_BINARY_ENV: &str = "GITHUB_ACTIONS_BINARY";

/// Default location of the binary, relative to the working directory.
pub const DEFAULT_ACTIONS_BINARY: &str = "../bin/github-actions";

/// Resolve the path of the binary under test.
///
/// A non-empty `GITHUB_ACTIONS_BINARY` is returned verbatim, without checking
/// that it exists.
pub fn get_actions_binary_path() -> E2eResult<PathBuf> {
    if let Some(path) = env_override(ACTIONS_BINARY_ENV) {
        return Ok(PathBuf::from(path));
    }

    Ok(current_dir()?.join(DEFAULT_ACTIONS_BINARY))
}

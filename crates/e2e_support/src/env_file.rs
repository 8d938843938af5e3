//! Env file parsing.
//!
//! An env file holds one `KEY=VALUE` assignment per line. There is no quoting,
//! no escaping and no comment syntax. The first `=` on a line separates the key
//! from the value, so values may themselves contain `=`.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::current_dir;
use crate::errors::{E2eResult, Error};

#[cfg(test)]
#[path = "env_file_tests.rs"]
mod tests;

/// A single environment variable assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Parse an env file into its assignments, in file order.
///
/// Relative paths are resolved against the current working directory. An empty
/// file yields an empty list.
///
/// # Errors
///
/// - [`Error::Io`] if the working directory cannot be determined or the file
///   cannot be opened
/// - [`Error::Scan`] if a line cannot be read
/// - [`Error::MalformedLine`] if a line has no `=`
pub fn parse_env_file(env_file: impl AsRef<Path>) -> E2eResult<Vec<EnvVar>> {
    let path = current_dir()?.join(env_file.as_ref());

    let action = format!("open env file '{}'", path.display());
    let file = File::open(&path).map_err(|e| Error::io(action, e))?;

    let mut vars = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|source| Error::Scan {
            line_number,
            source,
        })?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        vars.push(parse_line(line_number, line)?);
    }

    debug!(
        path = %path.display(),
        count = vars.len(),
        "Parsed env file"
    );
    Ok(vars)
}

/// Parse env file content that is already in memory.
pub fn parse_env_str(content: &str) -> E2eResult<Vec<EnvVar>> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| parse_line(index + 1, line))
        .collect()
}

fn parse_line(line_number: usize, line: &str) -> E2eResult<EnvVar> {
    match line.split_once('=') {
        Some((key, value)) => Ok(EnvVar::new(key, value)),
        None => Err(Error::MalformedLine {
            line_number,
            line: line.to_string(),
        }),
    }
}

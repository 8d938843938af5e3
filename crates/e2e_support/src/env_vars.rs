//! Applying and reverting env file assignments on the current process.
//!
//! The process environment is global. Nothing here locks it, so callers must
//! not mutate or read it from other threads while these functions run. Tests
//! that go through this module are marked `#[serial]`.

use std::env;

use tracing::{debug, warn};

use crate::env_file::EnvVar;
use crate::errors::{E2eResult, Error};

#[cfg(test)]
#[path = "env_vars_tests.rs"]
mod tests;

/// Set every variable on the process environment, in order.
///
/// Stops at the first variable that cannot be set. Variables set before the
/// failure are left in place; reverting them is up to the caller.
pub fn setup_env_vars(vars: &[EnvVar]) -> E2eResult<()> {
    for var in vars {
        let invalid = invalid_key_reason(&var.key)
            .or_else(|| invalid_value_reason(&var.value));
        if let Some(reason) = invalid {
            return Err(Error::EnvSet {
                key: var.key.clone(),
                reason: reason.to_string(),
            });
        }

        debug!(key = %var.key, "Setting environment variable");
        // SAFETY: callers serialize access to the process environment, see the
        // module documentation.
        unsafe {
            env::set_var(&var.key, &var.value);
        }
    }
    Ok(())
}

/// Remove every variable from the process environment, in order.
///
/// Stops at the first variable that cannot be removed. Removing a variable
/// that is not set is not an error.
pub fn remove_env_vars(vars: &[EnvVar]) -> E2eResult<()> {
    for var in vars {
        if let Some(reason) = invalid_key_reason(&var.key) {
            return Err(Error::EnvUnset {
                key: var.key.clone(),
                reason: reason.to_string(),
            });
        }

        debug!(key = %var.key, "Removing environment variable");
        // SAFETY: see `setup_env_vars`.
        unsafe {
            env::remove_var(&var.key);
        }
    }
    Ok(())
}

// std::env panics on these instead of returning an error.
fn invalid_key_reason(key: &str) -> Option<&'static str> {
    if key.is_empty() {
        Some("key is empty")
    } else if key.contains('=') {
        Some("key contains '='")
    } else if key.contains('\0') {
        Some("key contains a NUL character")
    } else {
        None
    }
}

fn invalid_value_reason(value: &str) -> Option<&'static str> {
    if value.contains('\0') {
        Some("value contains a NUL character")
    } else {
        None
    }
}

/// Keeps a set of variables applied for as long as the guard lives.
///
/// Dropping the guard removes the variables again, whatever happened in
/// between. Removal failures during drop are logged, not raised.
#[derive(Debug)]
pub struct EnvVarGuard {
    vars: Vec<EnvVar>,
}

impl EnvVarGuard {
    /// Apply `vars` and return a guard that removes them on drop.
    ///
    /// If applying fails part way, the variables already set are removed
    /// before the error is returned.
    pub fn apply(vars: Vec<EnvVar>) -> E2eResult<Self> {
        for (applied, var) in vars.iter().enumerate() {
            if let Err(e) = setup_env_vars(std::slice::from_ref(var)) {
                if let Err(cleanup) = remove_env_vars(&vars[..applied]) {
                    warn!(error = %cleanup, "Failed to undo partial env var setup");
                }
                return Err(e);
            }
        }

        Ok(Self { vars })
    }

    pub fn vars(&self) -> &[EnvVar] {
        &self.vars
    }

    /// Remove the variables now and surface any failure.
    pub fn release(mut self) -> E2eResult<()> {
        let vars = std::mem::take(&mut self.vars);
        remove_env_vars(&vars)
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if self.vars.is_empty() {
            return;
        }

        if let Err(e) = remove_env_vars(&self.vars) {
            warn!(error = %e, "Failed to remove environment variables");
        }
    }
}

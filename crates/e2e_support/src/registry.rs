//! Local container registry fixture.
//!
//! Starts a `registry:2` container with htpasswd basic auth through the
//! `docker` CLI, so login and push scenarios have something to talk to. The
//! credentials live in `<host path>/testdata/auth/htpasswd`.

use std::ffi::OsStr;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::errors::{E2eResult, Error};
use crate::process::{CommandExecutor, CommandSpec, StdioMode, SystemCommandExecutor};
use crate::{current_dir, env_override};

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

/// Name of the registry fixture container.
pub const REGISTRY_CONTAINER_NAME: &str = "github-actions-registry";

/// Image the registry fixture runs.
pub const REGISTRY_IMAGE: &str = "registry:2";

/// Port published by the registry on the host and in the container.
pub const REGISTRY_PORT: u16 = 5000;

/// Environment variable overriding the host path used for the auth bind mount.
///
/// Needed when the tests themselves run inside a container and talk to the
/// host's Docker daemon, where the daemon sees different paths.
pub const E2E_HOST_PATH_ENV: &str = "E2E_HOST_PATH";

const AUTH_REALM: &str = "Registry Realm";
const HTPASSWD_PATH: &str = "/auth/htpasswd";

/// Resolve the host path under which `testdata/auth` is found.
///
/// A non-empty `E2E_HOST_PATH` is returned verbatim, otherwise the current
/// working directory.
pub fn get_e2e_host_path() -> E2eResult<PathBuf> {
    if let Some(path) = env_override(E2E_HOST_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    current_dir()
}

/// Start the registry fixture with the system `docker` CLI.
pub fn setup_local_registry() -> E2eResult<()> {
    RegistryFixture::default().setup_local_registry()
}

/// Force-remove the registry fixture container with the system `docker` CLI.
pub fn remove_local_registry() -> E2eResult<()> {
    RegistryFixture::default().remove_local_registry()
}

/// Manages the registry fixture container.
#[derive(Debug, Clone)]
pub struct RegistryFixture<E = SystemCommandExecutor> {
    executor: E,
}

impl Default for RegistryFixture<SystemCommandExecutor> {
    fn default() -> Self {
        Self::new(SystemCommandExecutor)
    }
}

impl<E: CommandExecutor> RegistryFixture<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Start a fresh registry container.
    ///
    /// Any container left behind under the fixture name is removed first, and
    /// a failure to do so is ignored since usually there is nothing to remove.
    /// The container runs detached; `docker run` output goes to this process's
    /// stdout and stderr.
    pub fn setup_local_registry(&self) -> E2eResult<()> {
        if let Err(e) = self.remove_local_registry() {
            debug!(error = %e, "No previous registry container removed");
        }

        let mut auth_mount = get_e2e_host_path()?.into_os_string();
        auth_mount.push("/testdata/auth:/auth");
        info!(auth_mount = %auth_mount.to_string_lossy(), "Starting local registry");

        let outcome = self.executor.run(&docker_run_spec(&auth_mount))?;

        if !outcome.success() {
            return Err(Error::ContainerStart {
                container: REGISTRY_CONTAINER_NAME.to_string(),
                outcome,
            });
        }

        info!(container = REGISTRY_CONTAINER_NAME, "Local registry started");
        Ok(())
    }

    /// Force-remove the registry container.
    ///
    /// Fails with [`Error::ContainerRemove`] when `docker rm` exits non-zero,
    /// which includes the case where no such container exists.
    pub fn remove_local_registry(&self) -> E2eResult<()> {
        let outcome = self.executor.run(&docker_rm_spec())?;

        if !outcome.success() {
            return Err(Error::ContainerRemove {
                container: REGISTRY_CONTAINER_NAME.to_string(),
                outcome,
            });
        }

        debug!(container = REGISTRY_CONTAINER_NAME, "Local registry removed");
        Ok(())
    }

    /// Start the registry and tie its lifetime to the returned guard.
    pub fn start(self) -> E2eResult<LocalRegistry<E>> {
        self.setup_local_registry()?;
        Ok(LocalRegistry {
            fixture: Some(self),
        })
    }
}

/// A running registry fixture that is removed when dropped.
#[derive(Debug)]
pub struct LocalRegistry<E: CommandExecutor = SystemCommandExecutor> {
    fixture: Option<RegistryFixture<E>>,
}

impl<E: CommandExecutor> LocalRegistry<E> {
    /// Host address clients use to reach the registry.
    pub fn address(&self) -> String {
        format!("localhost:{}", REGISTRY_PORT)
    }

    /// Remove the container now and surface any failure.
    pub fn stop(mut self) -> E2eResult<()> {
        match self.fixture.take() {
            Some(fixture) => fixture.remove_local_registry(),
            None => Ok(()),
        }
    }
}

impl<E: CommandExecutor> Drop for LocalRegistry<E> {
    fn drop(&mut self) {
        if let Some(fixture) = self.fixture.take() {
            if let Err(e) = fixture.remove_local_registry() {
                warn!(error = %e, "Failed to remove local registry");
            }
        }
    }
}

fn docker_run_spec(auth_mount: &OsStr) -> CommandSpec {
    let ports = format!("{0}:{0}", REGISTRY_PORT);
    CommandSpec::new("docker")
        .args(["run", "-d", "-p", ports.as_str()])
        .args(["--name", REGISTRY_CONTAINER_NAME])
        .arg("-v")
        .arg(auth_mount)
        .args(["-e", "REGISTRY_AUTH=htpasswd"])
        .arg("-e")
        .arg(format!("REGISTRY_AUTH_HTPASSWD_REALM={}", AUTH_REALM))
        .arg("-e")
        .arg(format!("REGISTRY_AUTH_HTPASSWD_PATH={}", HTPASSWD_PATH))
        .arg(REGISTRY_IMAGE)
        .stdio(StdioMode::Inherit)
}

fn docker_rm_spec() -> CommandSpec {
    CommandSpec::new("docker")
        .args(["rm", "-f", REGISTRY_CONTAINER_NAME])
        .stdio(StdioMode::Null)
}

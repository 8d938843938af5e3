//! End-to-end scenarios for the `github-actions` binary.
//!
//! The scenarios live in `tests/`. They need a Docker daemon and a pre-built
//! binary, so they are ignored by default:
//!
//! ```bash
//! GITHUB_ACTIONS_BINARY=$PWD/bin/github-actions \
//!     cargo test -p e2e_tests -- --ignored --test-threads=1
//! ```
//!
//! When the tests run inside a container against the host's Docker daemon,
//! set `E2E_HOST_PATH` to this crate's directory as the host sees it, so the
//! registry can mount `testdata/auth`.

use e2e_support::RegistryFixture;
use tracing::info;

pub use e2e_support::LocalRegistry;

/// Credentials accepted by the registry fixture (`testdata/auth/htpasswd`).
pub const REGISTRY_USERNAME: &str = "testuser";
pub const REGISTRY_PASSWORD: &str = "testpassword";

/// Start a fresh registry fixture with logging initialized.
pub fn start_registry() -> anyhow::Result<LocalRegistry> {
    e2e_support::init_logging();

    let registry = RegistryFixture::default().start()?;
    info!(address = %registry.address(), "Registry fixture ready");
    Ok(registry)
}

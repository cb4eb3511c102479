// src/runtime/mod.rs

//! Python runtime discovery.
//!
//! - [`version`] holds `RuntimeVersion` and the `__pycache__` naming scheme.
//! - [`probe`] asks an interpreter for its version.
//! - [`resolver`] defines the `RuntimeResolver` seam and `ChainResolver`.
//! - [`system`] looks for interpreters on `PATH`.
//! - [`standalone`] downloads portable interpreters when none is installed.

pub mod probe;
pub mod resolver;
pub mod standalone;
pub mod system;
pub mod version;

use std::path::Path;

use tracing::info;

pub use probe::probe_version;
pub use resolver::{ChainResolver, ResolvedRuntime, RuntimeOrigin, RuntimeResolver};
pub use standalone::StandaloneResolver;
pub use system::SystemResolver;
pub use version::{ArtifactTag, RuntimeVersion, ARTIFACT_EXT, PYCACHE_DIR, SOURCE_EXT};

use crate::errors::Result;

/// Resolver chain used by the CLI: `PATH` first, then (optionally) a download.
pub fn default_resolver(cache_dir: &Path, download: bool) -> ChainResolver {
    let chain = ChainResolver::new().with(SystemResolver::new());
    if download {
        chain.with(StandaloneResolver::new(cache_dir))
    } else {
        chain
    }
}

/// Use the interpreter at `python` as-is, tagging artifacts with whatever
/// version it reports.
pub fn ambient_runtime(python: &Path) -> Result<ResolvedRuntime> {
    let version = probe_version(python)?;
    info!(python = %python.display(), %version, "using ambient Python runtime");
    Ok(ResolvedRuntime::ambient(version, python))
}

// src/runtime/resolver.rs

//! Pluggable runtime resolution.
//!
//! A `RuntimeResolver` turns a requested version into a local interpreter.
//! [`ChainResolver`] tries several resolvers in order; the default chain is
//! [`SystemResolver`](super::SystemResolver) followed by
//! [`StandaloneResolver`](super::StandaloneResolver).

use std::path::PathBuf;

use tracing::{debug, info};

use crate::errors::{PycifyError, Result};
use crate::runtime::RuntimeVersion;

/// How the interpreter was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeOrigin {
    /// Whatever interpreter the environment provides; no version was pinned.
    Ambient,
    /// An interpreter matching an explicitly requested version.
    Pinned,
}

/// A local interpreter ready to run `compileall`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRuntime {
    pub version: RuntimeVersion,
    pub executable: PathBuf,
    pub origin: RuntimeOrigin,
}

impl ResolvedRuntime {
    pub fn pinned(version: RuntimeVersion, executable: impl Into<PathBuf>) -> Self {
        Self {
            version,
            executable: executable.into(),
            origin: RuntimeOrigin::Pinned,
        }
    }

    pub fn ambient(version: RuntimeVersion, executable: impl Into<PathBuf>) -> Self {
        Self {
            version,
            executable: executable.into(),
            origin: RuntimeOrigin::Ambient,
        }
    }
}

/// Trait abstracting where interpreters come from.
pub trait RuntimeResolver {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Find (or fetch) an interpreter matching `version`.
    ///
    /// Fails with [`PycifyError::RuntimeNotAvailable`] when none can be found.
    fn ensure_runtime(&self, version: &RuntimeVersion) -> Result<ResolvedRuntime>;
}

/// Try each resolver in turn; the first success wins.
///
/// Only `RuntimeNotAvailable` moves on to the next resolver. Any other error
/// (a failed unpack, a full disk) ends the search and is returned as is.
#[derive(Default)]
pub struct ChainResolver {
    resolvers: Vec<Box<dyn RuntimeResolver>>,
}

impl ChainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resolver: impl RuntimeResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }
}

impl RuntimeResolver for ChainResolver {
    fn name(&self) -> &str {
        "chain"
    }

    fn ensure_runtime(&self, version: &RuntimeVersion) -> Result<ResolvedRuntime> {
        for resolver in &self.resolvers {
            match resolver.ensure_runtime(version) {
                Ok(runtime) => {
                    info!(
                        resolver = resolver.name(),
                        %version,
                        python = %runtime.executable.display(),
                        "resolved Python runtime"
                    );
                    return Ok(runtime);
                }
                Err(err @ PycifyError::RuntimeNotAvailable { .. }) => {
                    debug!(resolver = resolver.name(), %version, error = %err, "resolver failed");
                }
                Err(err) => return Err(err),
            }
        }

        Err(PycifyError::RuntimeNotAvailable {
            version: version.to_string(),
        })
    }
}

// src/runtime/system.rs

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{PycifyError, Result};
use crate::runtime::probe::probe_version;
use crate::runtime::{ResolvedRuntime, RuntimeResolver, RuntimeVersion};

/// Finds interpreters already installed on `PATH`.
///
/// Candidates are `python<major>.<minor>` then `python<major>`; the first one
/// whose probed version matches the request is used.
#[derive(Debug, Clone, Default)]
pub struct SystemResolver {
    search_path: Option<OsString>,
}

impl SystemResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search the given `PATH`-style list instead of the environment's.
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn candidates(version: &RuntimeVersion) -> Vec<String> {
        vec![
            format!("python{}.{}", version.major, version.minor),
            format!("python{}", version.major),
        ]
    }

    fn search_path(&self) -> Option<OsString> {
        self.search_path.clone().or_else(|| env::var_os("PATH"))
    }
}

impl RuntimeResolver for SystemResolver {
    fn name(&self) -> &str {
        "system"
    }

    fn ensure_runtime(&self, version: &RuntimeVersion) -> Result<ResolvedRuntime> {
        let search_path = self.search_path().unwrap_or_default();

        for name in Self::candidates(version) {
            let Some(executable) = find_executable(&name, &search_path) else {
                continue;
            };
            match probe_version(&executable) {
                Ok(found) if found.matches(version) => {
                    return Ok(ResolvedRuntime::pinned(found, executable));
                }
                Ok(found) => {
                    debug!(
                        python = %executable.display(),
                        %found,
                        wanted = %version,
                        "version mismatch"
                    );
                }
                Err(err) => {
                    debug!(python = %executable.display(), error = %err, "probe failed");
                }
            }
        }

        Err(PycifyError::RuntimeNotAvailable {
            version: version.to_string(),
        })
    }
}

/// Locate `name` in a `PATH`-style directory list.
pub fn find_executable(name: &str, search_path: &OsString) -> Option<PathBuf> {
    let name = Path::new(name);
    if name.components().count() > 1 {
        return name.is_file().then(|| name.to_path_buf());
    }

    env::split_paths(search_path).find_map(|dir| {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::runtime::RuntimeVersion;
use crate::types::CacheRemoval;

/// Configuration as read from `pycify.toml`, before validation.
///
/// ```toml
/// [compile]
/// python_version = "3.12"
///
/// [relocate]
/// out_dir = "build"
/// ignore_file_patterns = ["setup.py", "tests"]
/// cache_removal = "strict"
///
/// [runtime]
/// python = "/usr/bin/python3"
/// download = true
/// cache_dir = "~/.cache/pycify"
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub compile: CompileSection,

    #[serde(default)]
    pub relocate: RelocateSection,

    #[serde(default)]
    pub runtime: RuntimeSection,
}

/// `[compile]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompileSection {
    /// Pin the interpreter version used for compiling, e.g. `"3.12"`.
    #[serde(default)]
    pub python_version: Option<String>,
}

/// `[relocate]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelocateSection {
    /// Mirror output tree; sources are kept when set.
    #[serde(default)]
    pub out_dir: Option<PathBuf>,

    /// Replaces the built-in default (`["setup.py"]`) when present.
    #[serde(default)]
    pub ignore_file_patterns: Option<Vec<String>>,

    #[serde(default)]
    pub cache_removal: CacheRemoval,
}

/// `[runtime]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeSection {
    /// Interpreter used when no version is pinned.
    #[serde(default)]
    pub python: Option<PathBuf>,

    /// Allow downloading standalone interpreters for pinned versions.
    #[serde(default = "default_download")]
    pub download: bool,

    /// Where downloaded interpreters are kept.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_download() -> bool {
    true
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            python: None,
            download: default_download(),
            cache_dir: None,
        }
    }
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// the pinned version has been parsed and every ignore pattern compiles. The
/// `[compile]` section is kept only in its parsed form.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    relocate: RelocateSection,
    runtime: RuntimeSection,
    python_version: Option<RuntimeVersion>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        raw: RawConfigFile,
        python_version: Option<RuntimeVersion>,
    ) -> Self {
        Self {
            relocate: raw.relocate,
            runtime: raw.runtime,
            python_version,
        }
    }

    pub fn relocate_section(&self) -> &RelocateSection {
        &self.relocate
    }

    pub fn runtime_section(&self) -> &RuntimeSection {
        &self.runtime
    }

    pub fn python_version(&self) -> Option<RuntimeVersion> {
        self.python_version
    }
}

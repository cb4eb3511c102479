// src/relocate/mod.rs

//! Move compiled artifacts out of `__pycache__` folders.
//!
//! - [`patterns`] compiles the ignore patterns (`IgnoreSet`).
//! - [`walker`] implements the depth-first relocation itself.

pub mod patterns;
pub mod walker;

use std::path::{Path, PathBuf};

pub use patterns::{default_ignore_file_patterns, IgnoreSet};
pub use walker::relocate;

use crate::runtime::ArtifactTag;
use crate::types::CacheRemoval;

/// Per-call relocation settings.
#[derive(Debug, Clone)]
pub struct RelocateOptions {
    /// Mirror output tree. `None` (or the source dir itself) means in-place.
    pub out_dir: Option<PathBuf>,
    /// Which `cpython-XY` artifacts to pick up.
    pub tag: ArtifactTag,
    pub ignore: IgnoreSet,
    pub cache_removal: CacheRemoval,
}

impl RelocateOptions {
    pub fn new(tag: ArtifactTag) -> Self {
        Self {
            out_dir: None,
            tag,
            ignore: IgnoreSet::default(),
            cache_removal: CacheRemoval::default(),
        }
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }

    pub fn with_ignore(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_cache_removal(mut self, cache_removal: CacheRemoval) -> Self {
        self.cache_removal = cache_removal;
        self
    }

    /// Root of the output tree for a walk starting at `source_dir`.
    pub fn out_root<'a>(&'a self, source_dir: &'a Path) -> &'a Path {
        self.out_dir.as_deref().unwrap_or(source_dir)
    }
}

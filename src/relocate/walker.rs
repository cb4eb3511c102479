// src/relocate/walker.rs

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::errors::{PycifyError, Result};
use crate::fs::{relative_str, FileSystem};
use crate::relocate::RelocateOptions;
use crate::runtime::{ARTIFACT_EXT, PYCACHE_DIR, SOURCE_EXT};
use crate::types::CacheRemoval;

/// State shared by every level of one walk.
///
/// `root` is where the walk started; ignore patterns are always matched
/// against paths relative to it, however deep the current level is.
struct Walk<'a> {
    fs: &'a dyn FileSystem,
    root: &'a Path,
    options: &'a RelocateOptions,
}

/// Replace sources under `source_dir` with the artifacts in their
/// `__pycache__` folders.
///
/// In-place mode deletes each source once its artifact has been moved next
/// to it. With a distinct `options.out_dir`, artifacts land in the mirrored
/// location and sources are kept. Returns the paths of all relocated
/// artifacts; subdirectories are handled before their parent.
///
/// Under [`CacheRemoval::Strict`] every cache folder in the tree is checked
/// for unexpected entries first, so a run that would fail on leftovers fails
/// before anything is moved or deleted.
pub fn relocate(
    fs: &dyn FileSystem,
    source_dir: &Path,
    options: &RelocateOptions,
) -> Result<Vec<PathBuf>> {
    if !fs.is_dir(source_dir) {
        return Err(PycifyError::ConfigError(format!(
            "{} is not a directory",
            source_dir.display()
        )));
    }

    let walk = Walk {
        fs,
        root: source_dir,
        options,
    };
    if options.cache_removal == CacheRemoval::Strict {
        walk.check_caches(source_dir)?;
    }
    let created = walk.level(source_dir, options.out_root(source_dir))?;
    debug!(count = created.len(), "relocation finished");
    Ok(created)
}

impl Walk<'_> {
    /// Fail with `CacheNotEmpty` on the first cache folder holding anything
    /// besides the artifacts of its sources. Visits levels in walk order.
    fn check_caches(&self, dir: &Path) -> Result<()> {
        let entries = self.fs.read_dir(dir)?;
        for entry in &entries {
            if entry.file_name() != Some(OsStr::new(PYCACHE_DIR)) && self.fs.is_dir(entry) {
                self.check_caches(entry)?;
            }
        }

        let cache_dir = dir.join(PYCACHE_DIR);
        if !self.fs.is_dir(&cache_dir) {
            return Ok(());
        }

        let expected: HashSet<PathBuf> = entries
            .iter()
            .filter(|p| self.is_source(p))
            .filter_map(|source| source_stem(source))
            .map(|stem| cache_dir.join(self.options.tag.artifact_name(stem)))
            .collect();
        let leftovers: Vec<PathBuf> = self
            .fs
            .read_dir(&cache_dir)?
            .into_iter()
            .filter(|entry| !expected.contains(entry) || !self.fs.is_file(entry))
            .collect();

        if leftovers.is_empty() {
            Ok(())
        } else {
            Err(PycifyError::CacheNotEmpty {
                path: cache_dir,
                leftovers,
            })
        }
    }

    fn level(&self, dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = self.fs.read_dir(dir)?;
        let mut created = Vec::new();

        // Nested cache folders are independent of ours, so children go first.
        for entry in &entries {
            let Some(name) = entry.file_name() else {
                continue;
            };
            if name == PYCACHE_DIR || !self.fs.is_dir(entry) {
                continue;
            }
            created.extend(self.level(entry, &out_dir.join(name))?);
        }

        let cache_dir = dir.join(PYCACHE_DIR);
        if !self.fs.is_dir(&cache_dir) {
            return Ok(created);
        }

        self.fs.create_dir_all(out_dir)?;
        let in_place = dir == out_dir;

        for source in entries.iter().filter(|p| self.is_source(p)) {
            if let Some(artifact) = self.relocate_source(source, &cache_dir, out_dir, in_place)? {
                created.push(artifact);
            }
        }

        self.remove_cache(&cache_dir)?;
        Ok(created)
    }

    fn is_source(&self, path: &Path) -> bool {
        path.extension() == Some(OsStr::new(SOURCE_EXT)) && self.fs.is_file(path)
    }

    /// Move one source's artifact into `out_dir`. Returns `None` when the
    /// source is ignored, has no artifact, or has a non-UTF-8 name.
    fn relocate_source(
        &self,
        source: &Path,
        cache_dir: &Path,
        out_dir: &Path,
        in_place: bool,
    ) -> Result<Option<PathBuf>> {
        let (Some(stem), Some(rel)) = (source_stem(source), relative_str(self.root, source))
        else {
            warn!("NOTE: {} is not a valid UTF-8 path, skipping.", source.display());
            return Ok(None);
        };
        let artifact = cache_dir.join(self.options.tag.artifact_name(stem));

        if let Some(pattern) = self.options.ignore.matching(&rel) {
            warn!(
                "NOTE: Ignoring {} as per ignore_file_patterns ({pattern}).",
                source.display()
            );
            if self.fs.is_file(&artifact) {
                self.fs.remove_file(&artifact)?;
            }
            return Ok(None);
        }

        if !self.fs.is_file(&artifact) {
            warn!("NOTE: {} not found, skipping.", artifact.display());
            return Ok(None);
        }

        info!("Replacing {} with {}", source.display(), artifact.display());
        let target = out_dir.join(format!("{stem}.{ARTIFACT_EXT}"));
        self.fs.rename(&artifact, &target)?;
        if in_place {
            self.fs.remove_file(source)?;
        }
        Ok(Some(target))
    }

    fn remove_cache(&self, cache_dir: &Path) -> Result<()> {
        let leftovers = self.fs.read_dir(cache_dir)?;
        if leftovers.is_empty() {
            self.fs.remove_dir(cache_dir)?;
            return Ok(());
        }

        match self.options.cache_removal {
            CacheRemoval::Strict => Err(PycifyError::CacheNotEmpty {
                path: cache_dir.to_path_buf(),
                leftovers,
            }),
            CacheRemoval::Force => {
                debug!(
                    cache = %cache_dir.display(),
                    count = leftovers.len(),
                    "force-removing cache folder with leftovers"
                );
                self.fs.remove_dir_all(cache_dir)?;
                Ok(())
            }
        }
    }
}

fn source_stem(source: &Path) -> Option<&str> {
    source.file_stem().and_then(OsStr::to_str)
}

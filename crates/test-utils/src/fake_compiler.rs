use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use pycify::compile::CompilerBackend;
use pycify::errors::Result;
use pycify::fs::FileSystem;
use pycify::runtime::{ArtifactTag, PYCACHE_DIR, SOURCE_EXT};

/// A fake compiler that:
/// - writes `__pycache__/<stem>.cpython-XY.pyc` next to every `.py` file
///   (content `compiled:<relative source path>`)
/// - skips sources whose file name was registered with `skip`, mimicking
///   files `compileall` refuses to compile
/// - records which directories it was asked to compile.
#[derive(Debug)]
pub struct FakeCompiler<'a> {
    fs: &'a dyn FileSystem,
    tag: ArtifactTag,
    skip: BTreeSet<String>,
    compiled: Arc<Mutex<Vec<String>>>,
}

impl<'a> FakeCompiler<'a> {
    pub fn new(fs: &'a dyn FileSystem, tag: ArtifactTag) -> Self {
        Self {
            fs,
            tag,
            skip: BTreeSet::new(),
            compiled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn skip(mut self, file_name: &str) -> Self {
        self.skip.insert(file_name.to_string());
        self
    }

    /// Directories passed to `compile_tree`, in call order.
    pub fn compiled_dirs(&self) -> Vec<String> {
        self.compiled.lock().unwrap().clone()
    }

    fn compile_dir(&self, root: &Path, dir: &Path) -> Result<()> {
        for entry in self.fs.read_dir(dir)? {
            let Some(name) = entry.file_name().and_then(OsStr::to_str) else {
                continue;
            };
            if self.fs.is_dir(&entry) {
                if name != PYCACHE_DIR {
                    self.compile_dir(root, &entry)?;
                }
                continue;
            }
            if entry.extension() != Some(OsStr::new(SOURCE_EXT)) || self.skip.contains(name) {
                continue;
            }
            let Some(stem) = entry.file_stem().and_then(OsStr::to_str) else {
                continue;
            };
            let rel = entry.strip_prefix(root).unwrap_or(entry.as_path()).to_string_lossy();
            let artifact = dir.join(PYCACHE_DIR).join(self.tag.artifact_name(stem));
            self.fs.write(&artifact, format!("compiled:{rel}").as_bytes())?;
        }
        Ok(())
    }
}

impl CompilerBackend for FakeCompiler<'_> {
    fn compile_tree(&self, dir: &Path) -> Result<()> {
        self.compiled
            .lock()
            .unwrap()
            .push(dir.to_string_lossy().into_owned());
        self.compile_dir(dir, dir)
    }
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for a throwaway source tree on the real filesystem.
pub struct SourceTreeBuilder {
    dir: TempDir,
}

impl SourceTreeBuilder {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("creating temp dir"),
        }
    }

    /// Add a file at `rel` (forward slashes) with the given contents.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("creating parent dirs");
        }
        fs::write(&path, contents).expect("writing file");
        self
    }

    /// Add a Python source at `rel`.
    pub fn source(self, rel: &str) -> Self {
        let contents = format!("# {rel}\nVALUE = 1\n");
        self.file(rel, &contents)
    }

    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.dir.path().join(rel)).expect("creating dir");
        self
    }

    pub fn build(self) -> SourceTree {
        SourceTree { dir: self.dir }
    }
}

impl Default for SourceTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A built source tree; deleted on drop.
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// All files below `rel`, as sorted forward-slash paths relative to it.
    pub fn files_under(&self, rel: &str) -> Vec<String> {
        list_files(&self.path(rel))
    }

    /// All files in the tree, as sorted forward-slash relative paths.
    pub fn files(&self) -> Vec<String> {
        list_files(self.root())
    }
}

/// Recursively list files under `root`, sorted, relative, with `/`.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    if root.is_dir() {
        collect(root, root, &mut files);
    }
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<String>) {
    for entry in fs::read_dir(dir).expect("reading dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            collect(root, &path, files);
        } else if let Ok(rel) = path.strip_prefix(root) {
            files.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}

/// Sorted list of files with the given extension.
pub fn with_extension(files: &[String], ext: &str) -> Vec<String> {
    let suffix = format!(".{ext}");
    files
        .iter()
        .filter(|f| f.ends_with(&suffix))
        .cloned()
        .collect()
}

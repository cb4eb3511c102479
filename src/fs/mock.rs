// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, bail, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
}

/// In-memory filesystem. Directories are implicit parents of their entries;
/// `read_dir` yields children in path order.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<BTreeMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        Self::ensure_ancestors(&mut entries, path);
        entries.insert(path.to_path_buf(), MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        Self::ensure_ancestors(&mut entries, path);
        entries.insert(path.to_path_buf(), MockEntry::Dir);
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.entries.lock().unwrap().get(path.as_ref()) {
            Some(MockEntry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// All file paths currently stored, in path order.
    pub fn files(&self) -> Vec<PathBuf> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, entry)| matches!(entry, MockEntry::File(_)))
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn ensure_ancestors(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            entries
                .entry(ancestor.to_path_buf())
                .or_insert(MockEntry::Dir);
        }
    }

    fn children(entries: &BTreeMap<PathBuf, MockEntry>, path: &Path) -> Vec<PathBuf> {
        entries
            .keys()
            .filter(|candidate| candidate.parent() == Some(path))
            .cloned()
            .collect()
    }
}

impl FileSystem for MockFileSystem {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries.lock().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.entries.lock().unwrap().get(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries.lock().unwrap().get(path), Some(MockEntry::Dir))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::Dir) => Ok(Self::children(&entries, path)),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(MockEntry::File(_)) = entries.get(path) {
            bail!("File exists: {:?}", path);
        }
        Self::ensure_ancestors(&mut entries, path);
        entries.insert(path.to_path_buf(), MockEntry::Dir);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        let parent_is_dir = match to.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                matches!(entries.get(parent), Some(MockEntry::Dir))
            }
            _ => true,
        };
        if !parent_is_dir {
            bail!("Parent directory not found: {:?}", to);
        }
        match entries.remove(from) {
            Some(MockEntry::File(content)) => {
                entries.insert(to.to_path_buf(), MockEntry::File(content));
                Ok(())
            }
            Some(entry) => {
                entries.insert(from.to_path_buf(), entry);
                Err(anyhow!("Is a directory: {:?}", from))
            }
            None => Err(anyhow!("File not found: {:?}", from)),
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::File(_)) => {
                entries.remove(path);
                Ok(())
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::Dir) => {
                if !Self::children(&entries, path).is_empty() {
                    bail!("Directory not empty: {:?}", path);
                }
                entries.remove(path);
                Ok(())
            }
            Some(MockEntry::File(_)) => Err(anyhow!("Not a directory: {:?}", path)),
            None => Err(anyhow!("Directory not found: {:?}", path)),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        if !matches!(entries.get(path), Some(MockEntry::Dir)) {
            bail!("Not a directory or not found: {:?}", path);
        }
        entries.retain(|candidate, _| !candidate.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_file_creates_parent_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("root/pkg/mod.py", "x = 1");

        assert!(fs.is_dir(Path::new("root")));
        assert!(fs.is_dir(Path::new("root/pkg")));
        assert_eq!(
            fs.read_dir(Path::new("root")).unwrap(),
            vec![PathBuf::from("root/pkg")]
        );
    }

    #[test]
    fn remove_dir_refuses_non_empty() {
        let fs = MockFileSystem::new();
        fs.add_file("root/__pycache__/stray.txt", "");

        assert!(fs.remove_dir(Path::new("root/__pycache__")).is_err());
        fs.remove_dir_all(Path::new("root/__pycache__")).unwrap();
        assert!(!fs.exists(Path::new("root/__pycache__/stray.txt")));
        assert!(fs.is_dir(Path::new("root")));
    }

    #[test]
    fn rename_requires_target_parent() {
        let fs = MockFileSystem::new();
        fs.add_file("root/a.pyc", "bytes");

        assert!(fs.rename(Path::new("root/a.pyc"), Path::new("out/a.pyc")).is_err());
        assert!(fs.is_file(Path::new("root/a.pyc")));

        fs.create_dir_all(Path::new("out")).unwrap();
        fs.rename(Path::new("root/a.pyc"), Path::new("out/a.pyc")).unwrap();
        assert_eq!(fs.contents("out/a.pyc"), Some(b"bytes".to_vec()));
    }
}

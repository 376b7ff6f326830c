// src/fs/mock.rs

use super::FileSystem;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEntry {
    File,
    Dir,
}

/// In-memory filesystem for precondition tests.
///
/// Adding an entry implicitly creates its parent directories.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::File);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Dir);
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut entries = self.entries.lock().unwrap();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            entries.entry(ancestor.to_path_buf()).or_insert(MockEntry::Dir);
        }
        entries.insert(path.to_path_buf(), entry);
    }

    fn get(&self, path: &Path) -> Option<MockEntry> {
        self.entries.lock().unwrap().get(path).copied()
    }
}

impl FileSystem for MockFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.get(path) == Some(MockEntry::File)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.get(path) == Some(MockEntry::Dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parents_are_created_as_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("/opt/octez/bin/baker");

        assert!(fs.is_file(Path::new("/opt/octez/bin/baker")));
        assert!(fs.is_dir(Path::new("/opt/octez/bin")));
        assert!(fs.is_dir(Path::new("/opt")));
        assert!(!fs.is_file(Path::new("/opt/other")));
        assert!(!fs.is_dir(Path::new("/opt/other")));
    }
}

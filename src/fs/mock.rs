// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MockState {
    files: BTreeMap<PathBuf, Vec<u8>>,
    /// Writes to these paths fail, to exercise partial builds.
    read_only: BTreeSet<PathBuf>,
}

/// In-memory filesystem for tests. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        state.files.insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Make every later write to `path` fail.
    pub fn deny_writes(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.read_only.insert(path.as_ref().to_path_buf());
    }

    /// Paths of all files currently stored, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let state = self.state.lock().unwrap();
        state.files.keys().cloned().collect()
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state.files.get(path.as_ref()).cloned()
    }
}

impl FileSystem for MockFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.read_only.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

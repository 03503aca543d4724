// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Filesystem seam for the two places that touch disk: writing job files
/// and reading the archive to upload.
pub trait FileSystem: Send + Sync + Debug {
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Create or truncate `path`, creating missing parent directories.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("reading file {:?}", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating dir {:?}", parent))?;
            }
        }
        let mut file = fs::File::create(path).with_context(|| format!("creating file {:?}", path))?;
        file.write_all(contents).with_context(|| format!("writing to file {:?}", path))?;
        Ok(())
    }
}

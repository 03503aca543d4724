// src/properties/writer.rs

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{AzkabanError, Result};
use crate::fs::FileSystem;
use crate::job::{JobRegistry, JobSpec};
use crate::properties::serializer::{PropertiesFile, serialize};

/// Writes rendered job files into a single output directory.
///
/// Files are overwritten in place; nothing is buffered across specs, so a
/// failure part-way through leaves earlier files on disk.
#[derive(Debug)]
pub struct PropertiesWriter<F: FileSystem> {
    fs: F,
    output_dir: PathBuf,
}

impl<F: FileSystem> PropertiesWriter<F> {
    pub fn new(fs: F, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write one rendered file and return its path.
    pub fn write(&self, file: &PropertiesFile) -> Result<PathBuf> {
        let path = self.output_dir.join(&file.file_name);
        self.fs.write(&path, file.content.as_bytes())?;
        info!(file = %file.file_name, "Created {}", file.file_name);
        Ok(path)
    }

    /// Serialize and write a single spec. `Ok(None)` means the spec was a
    /// no-op.
    pub fn write_spec(&self, spec: &JobSpec, registry: &JobRegistry) -> Result<Option<PathBuf>> {
        match serialize(spec, registry.tasks())? {
            Some(file) => self.write(&file).map(Some),
            None => Ok(None),
        }
    }

    /// Write every spec in declaration order.
    ///
    /// On failure the error is wrapped in [`AzkabanError::BuildAborted`]
    /// carrying the number of files already written.
    pub fn write_all(&self, registry: &JobRegistry) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for spec in registry.specs() {
            match self.write_spec(spec, registry) {
                Ok(Some(path)) => written.push(path),
                Ok(None) => {}
                Err(err) => {
                    return Err(AzkabanError::BuildAborted {
                        written: written.len(),
                        source: Box::new(err),
                    });
                }
            }
        }
        Ok(written)
    }
}

/// Render every spec without touching the filesystem.
pub fn render_all(registry: &JobRegistry) -> Result<Vec<PropertiesFile>> {
    let mut files = Vec::new();
    for spec in registry.specs() {
        if let Some(file) = serialize(spec, registry.tasks())? {
            files.push(file);
        }
    }
    Ok(files)
}

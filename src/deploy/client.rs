// src/deploy/client.rs

//! Shared HTTP client setup for both upload protocols.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use reqwest::multipart::Part;
use reqwest::redirect::Policy;
use reqwest::{Body, Client};
use tracing::warn;

use crate::deploy::mime::mime_for_path;
use crate::errors::{AzkabanError, Result};
use crate::fs::mock::MockFileSystem;
use crate::fs::{FileSystem, RealFileSystem};

/// Large archives can take a long time to upload on slow links.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(1200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    /// Upper bound on a single request, upload included.
    pub upload_timeout: Duration,
    /// Skip TLS certificate verification. Off unless explicitly requested.
    pub insecure_skip_tls_verify: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
            insecure_skip_tls_verify: false,
        }
    }
}

/// Build the HTTP client used for uploads.
///
/// Redirects are never followed: the redirect protocol reads the outcome
/// from the 302 itself.
pub fn build_client(options: &DeployOptions) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(concat!("azkaban-jobs/", env!("CARGO_PKG_VERSION")))
        .timeout(options.upload_timeout)
        .redirect(Policy::none());

    if options.insecure_skip_tls_verify {
        warn!("TLS certificate verification is disabled for Azkaban requests");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| AzkabanError::DeploymentTransport(format!("failed to build HTTP client: {e}")))
}

/// Where the upload reads its archive from.
///
/// The real filesystem streams the file so large archives are never held
/// in memory; the mock hands back its stored bytes.
pub trait ArchiveSource: Send + Sync {
    /// Open `path` for upload, returning the body and its length in bytes.
    fn open_archive(&self, path: &Path) -> impl Future<Output = Result<(Body, u64)>> + Send;
}

impl ArchiveSource for RealFileSystem {
    async fn open_archive(&self, path: &Path) -> Result<(Body, u64)> {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("opening archive {:?}", path))?;
        let len = file
            .metadata()
            .await
            .with_context(|| format!("reading metadata of {:?}", path))?
            .len();
        Ok((Body::from(file), len))
    }
}

impl ArchiveSource for MockFileSystem {
    async fn open_archive(&self, path: &Path) -> Result<(Body, u64)> {
        let bytes = self.read(path)?;
        let len = bytes.len() as u64;
        Ok((Body::from(bytes), len))
    }
}

/// Wrap the archive as the multipart `file` part.
pub(crate) async fn archive_part<S: ArchiveSource>(source: &S, archive: &Path) -> Result<Part> {
    let (body, len) = source.open_archive(archive).await?;
    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "jobs.zip".to_string());
    let part = Part::stream_with_length(body, len)
        .file_name(file_name)
        .mime_str(mime_for_path(archive))?;
    Ok(part)
}

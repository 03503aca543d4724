// src/deploy/redirect.rs

//! Session-less upload protocol.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::LOCATION;
use reqwest::multipart::Form;
use reqwest::{Client, StatusCode};
use tracing::info;

use crate::deploy::client::{ArchiveSource, DeployOptions, archive_part, build_client};
use crate::errors::{AzkabanError, Result};
use crate::fs::RealFileSystem;

static SUCCESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Installation Succeeded").expect("valid success pattern"));
static FAILURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Installation Failed:\s*(.+)").expect("valid failure pattern"));

/// Uploads an archive with a single multipart POST and reads the verdict
/// from the redirect target.
#[derive(Debug, Clone)]
pub struct RedirectDeployer<F: ArchiveSource = RealFileSystem> {
    client: Client,
    fs: F,
}

impl RedirectDeployer<RealFileSystem> {
    pub fn new(options: &DeployOptions) -> Result<Self> {
        Self::with_fs(options, RealFileSystem)
    }
}

impl<F: ArchiveSource> RedirectDeployer<F> {
    pub fn with_fs(options: &DeployOptions, fs: F) -> Result<Self> {
        Ok(Self {
            client: build_client(options)?,
            fs,
        })
    }

    /// POST `{path, file}` to `endpoint`.
    ///
    /// Anything but a 302 is a transport failure; the `Location` header of
    /// the 302 decides between success, rejection and "unknown".
    pub async fn deploy(&self, endpoint: &str, path: &str, archive: &Path) -> Result<()> {
        let form = Form::new()
            .text("path", path.to_string())
            .part("file", archive_part(&self.fs, archive).await?);

        info!(endpoint, archive = %archive.display(), "Uploading jobs ZIP file to {}", endpoint);
        let response = self.client.post(endpoint).multipart(form).send().await?;

        let status = response.status();
        if status != StatusCode::FOUND {
            return Err(AzkabanError::DeploymentTransport(format!(
                "expected a 302 redirect after upload, got {status}"
            )));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        interpret_location(location)?;

        info!(endpoint, "Successfully uploaded to Azkaban");
        Ok(())
    }
}

/// Map the redirect target of an upload to its outcome.
pub fn interpret_location(location: &str) -> Result<()> {
    if SUCCESS.is_match(location) {
        return Ok(());
    }
    if let Some(caps) = FAILURE.captures(location) {
        return Err(AzkabanError::DeploymentRejected(caps[1].trim().to_string()));
    }
    Err(AzkabanError::DeploymentUnknown(location.to_string()))
}

// src/deploy/session.rs

//! Login + upload protocol used by session-based servers.

use std::fmt;
use std::path::Path;

use reqwest::header::SET_COOKIE;
use reqwest::multipart::Form;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::deploy::client::{ArchiveSource, DeployOptions, archive_part, build_client};
use crate::errors::{AzkabanError, Result};
use crate::fs::RealFileSystem;

/// Cookie the server sets when it rejects an upload.
pub const FAILURE_COOKIE: &str = "azkaban.failure.message";

/// Session token returned by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId(***)")
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default, rename = "session.id")]
    session_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionDeployer<F: ArchiveSource = RealFileSystem> {
    client: Client,
    fs: F,
}

impl SessionDeployer<RealFileSystem> {
    pub fn new(options: &DeployOptions) -> Result<Self> {
        Self::with_fs(options, RealFileSystem)
    }
}

impl<F: ArchiveSource> SessionDeployer<F> {
    pub fn with_fs(options: &DeployOptions, fs: F) -> Result<Self> {
        Ok(Self {
            client: build_client(options)?,
            fs,
        })
    }

    /// Log in and return the session id.
    pub async fn authenticate(
        &self,
        endpoint: &str,
        username: &str,
        password: &str,
    ) -> Result<SessionId> {
        let form = [
            ("action", "login"),
            ("username", username),
            ("password", password),
        ];
        debug!(endpoint, username, "logging in to Azkaban");
        let response = self.client.post(endpoint).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AzkabanError::DeploymentTransport(format!(
                "login request returned {status}"
            )));
        }

        let body = response.text().await?;
        let login: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            AzkabanError::Authentication(format!("unreadable login response: {e}"))
        })?;

        match (login.status.as_deref(), login.session_id) {
            (Some("success"), Some(id)) => {
                info!(endpoint, username, "logged in to Azkaban");
                Ok(SessionId(id))
            }
            _ => Err(AzkabanError::Authentication(
                login
                    .error
                    .unwrap_or_else(|| "server did not return a session id".to_string()),
            )),
        }
    }

    /// Upload the archive into an existing project.
    ///
    /// The server reports failure only through the `azkaban.failure.message`
    /// cookie, so the rejection carries no reason text.
    pub async fn deploy_with_session(
        &self,
        endpoint: &str,
        project: &str,
        archive: &Path,
        session: &SessionId,
    ) -> Result<()> {
        let form = Form::new()
            .text("action", "upload")
            .text("session.id", session.as_str().to_string())
            .text("project", project.to_string())
            .part("file", archive_part(&self.fs, archive).await?);

        info!(endpoint, project, archive = %archive.display(), "Uploading jobs ZIP file to {}", endpoint);
        let response = self.client.post(endpoint).multipart(form).send().await?;

        let rejected = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|cookie| cookie.contains(FAILURE_COOKIE));
        if rejected {
            return Err(AzkabanError::DeploymentRejected(format!(
                "server set the {FAILURE_COOKIE} cookie for project '{project}'"
            )));
        }

        let status = response.status();
        if !status.is_success() && !status.is_redirection() {
            return Err(AzkabanError::DeploymentTransport(format!(
                "upload request returned {status}"
            )));
        }

        info!(endpoint, project, "Successfully uploaded to Azkaban");
        Ok(())
    }
}

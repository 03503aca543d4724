// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AzkabanError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Duplicate job: {0}")]
    DuplicateJob(String),

    #[error("Job '{job}' depends on '{dependency}', which cannot be resolved")]
    UnresolvedDependency { job: String, dependency: String },

    #[error("Cycle detected in job dependencies: {0}")]
    DependencyCycle(String),

    #[error("Error while uploading to Azkaban: {0}")]
    DeploymentTransport(String),

    #[error("Failed to upload to Azkaban: {0}")]
    DeploymentRejected(String),

    #[error("Failed to upload to Azkaban for unknown reason (location: {0})")]
    DeploymentUnknown(String),

    #[error("Azkaban login failed: {0}")]
    Authentication(String),

    #[error("Build aborted after writing {written} file(s): {source}")]
    BuildAborted {
        written: usize,
        #[source]
        source: Box<AzkabanError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for AzkabanError {
    fn from(err: reqwest::Error) -> Self {
        AzkabanError::DeploymentTransport(err.to_string())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AzkabanError>;

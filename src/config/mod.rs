// src/config/mod.rs

//! Job definition files (`Jobs.toml`).
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a file from disk and turn it into a job registry (`loader.rs`).
//! - Validate what the output format and job kinds can express
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{build_registry, default_config_path, load_and_validate, load_from_path, load_registry};
pub use model::{
    CacheConfig, ConfigFile, ConfigSection, DeploySection, JobConfig, LockConfig, RawConfigFile,
    ScalarValue,
};

// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile, stringify};
use crate::errors::Result;
use crate::job::{JobDefaults, JobRegistry, LockOptions};

/// Load a job definition file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a job definition file and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Populate a fresh [`JobRegistry`] from a validated file, declaring jobs in
/// file order.
pub fn build_registry(cfg: &ConfigFile) -> Result<JobRegistry> {
    let defaults = JobDefaults {
        output_dir: cfg.config.output_dir.clone(),
        jvm_args: stringify(&cfg.config.default_jvm_args),
    };
    let mut registry = JobRegistry::new(defaults);

    for job in cfg.job.iter() {
        let mut builder =
            registry.declare_with_format(job.kind, job.format, job.name.trim(), job.after.clone())?;

        if let Some(uses) = job.uses.as_deref() {
            builder.uses(uses)?;
        }
        builder.set(stringify(&job.args));
        if !job.parameters.is_empty() {
            builder.parameter(stringify(&job.parameters))?;
        }
        for lock in job.reads.iter() {
            builder.reads_with(lock.path(), &lock_options(lock.alias()));
        }
        for lock in job.writes.iter() {
            builder.writes_with(lock.path(), &lock_options(lock.alias()));
        }
        for cache in job.caches.iter() {
            builder.caches(&cache.path, &cache.alias);
        }
        if !job.jvm_args.is_empty() {
            builder.jvm_args(stringify(&job.jvm_args));
        }
    }

    debug!(jobs = registry.len(), "job registry built");
    Ok(registry)
}

/// Load, validate and build in one step.
pub fn load_registry(path: impl AsRef<Path>) -> Result<(ConfigFile, JobRegistry)> {
    let cfg = load_and_validate(path)?;
    let registry = build_registry(&cfg)?;
    Ok((cfg, registry))
}

/// Default job definition file: `Jobs.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Jobs.toml")
}

fn lock_options(alias: Option<&str>) -> LockOptions {
    LockOptions {
        alias: alias.map(|a| a.to_string()),
    }
}

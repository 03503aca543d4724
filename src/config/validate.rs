// src/config/validate.rs

use crate::config::model::{ConfigFile, JobConfig, RawConfigFile, ScalarValue};
use crate::errors::{AzkabanError, Result};
use crate::job::variant_for;
use crate::types::JobKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::AzkabanError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.deploy, raw.job))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_deploy_section(cfg)?;
    validate_properties("[config].default_jvm_args", cfg.config.default_jvm_args.iter())?;
    for job in cfg.job.iter() {
        validate_job(job)?;
    }
    Ok(())
}

fn validate_deploy_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.deploy.upload_timeout_secs == 0 {
        return Err(AzkabanError::ConfigError(
            "[deploy].upload_timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_job(job: &JobConfig) -> Result<()> {
    let name = job.name.trim();
    if name.is_empty() {
        return Err(AzkabanError::ConfigError(
            "every [[job]] needs a non-empty `name`".to_string(),
        ));
    }
    if name.split(':').any(|segment| segment.is_empty()) {
        return Err(AzkabanError::ConfigError(format!(
            "job name '{name}' has an empty namespace segment"
        )));
    }

    if job.uses.is_some() && variant_for(job.kind).uses_key.is_none() {
        return Err(AzkabanError::ConfigError(format!(
            "job '{name}' of kind {} does not take `uses`",
            job.kind
        )));
    }

    if !job.parameters.is_empty() && job.kind != JobKind::Pig {
        return Err(AzkabanError::ConfigError(format!(
            "job '{name}' sets `parameters`, which only pig jobs support"
        )));
    }

    for dep in job.after.iter() {
        if dep.trim_start_matches('^').is_empty() {
            return Err(AzkabanError::ConfigError(format!(
                "job '{name}' has an empty dependency name in `after`"
            )));
        }
    }

    if job.uses.as_deref().is_some_and(|uses| uses.contains('\n')) {
        return Err(AzkabanError::ConfigError(format!(
            "job '{name}': `uses` spans multiple lines"
        )));
    }

    for lock in job.reads.iter().chain(job.writes.iter()) {
        validate_lock_path(name, lock.path())?;
        if let Some(alias) = lock.alias() {
            validate_alias(name, alias)?;
        }
    }
    for cache in job.caches.iter() {
        validate_lock_path(name, &cache.path)?;
        if cache.path.contains('#') {
            return Err(AzkabanError::ConfigError(format!(
                "job '{name}': invalid lock path {:?}",
                cache.path
            )));
        }
        validate_alias(name, &cache.alias)?;
    }

    validate_properties(name, job.args.iter())?;
    validate_properties(name, job.jvm_args.iter())?;
    validate_properties(name, job.parameters.iter())?;
    Ok(())
}

/// The output format has no escaping, so keys must not contain `=` and
/// neither keys nor values may span lines.
fn validate_properties<'a>(
    owner: &str,
    entries: impl Iterator<Item = (&'a String, &'a ScalarValue)>,
) -> Result<()> {
    for (key, value) in entries {
        if key.is_empty() || key.contains('=') || key.contains('\n') {
            return Err(AzkabanError::ConfigError(format!(
                "{owner}: invalid property key {key:?}"
            )));
        }
        if let ScalarValue::String(s) = value {
            if s.contains('\n') {
                return Err(AzkabanError::ConfigError(format!(
                    "{owner}: value of {key:?} spans multiple lines"
                )));
            }
        }
    }
    Ok(())
}

/// Lock paths end up comma-joined on a single `read.lock`/`write.lock` line.
fn validate_lock_path(owner: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() || path.contains(',') || path.contains('\n') {
        return Err(AzkabanError::ConfigError(format!(
            "job '{owner}': invalid lock path {path:?}"
        )));
    }
    Ok(())
}

/// Aliases become property keys (`param.<alias>`) or `#<alias>` cache suffixes.
fn validate_alias(owner: &str, alias: &str) -> Result<()> {
    if alias.is_empty() || alias.contains(['=', ',', '#', '\n']) {
        return Err(AzkabanError::ConfigError(format!(
            "job '{owner}': invalid alias {alias:?}"
        )));
    }
    Ok(())
}

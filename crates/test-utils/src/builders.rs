#![allow(dead_code)]

use indexmap::IndexMap;

use azkaban_jobs::config::{
    CacheConfig, ConfigFile, ConfigSection, DeploySection, JobConfig, LockConfig, RawConfigFile,
    ScalarValue,
};
use azkaban_jobs::types::{JobKind, SpecFormat};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                deploy: DeploySection::default(),
                job: Vec::new(),
            },
        }
    }

    pub fn with_job(mut self, job: JobConfig) -> Self {
        self.config.job.push(job);
        self
    }

    pub fn with_output_dir(mut self, dir: &str) -> Self {
        self.config.config.output_dir = dir.into();
        self
    }

    pub fn with_default_jvm_arg(mut self, key: &str, value: &str) -> Self {
        self.config
            .config
            .default_jvm_args
            .insert(key.to_string(), ScalarValue::String(value.to_string()));
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single `[[job]]` entry.
pub struct JobConfigBuilder {
    job: JobConfig,
}

impl JobConfigBuilder {
    pub fn new(name: &str, kind: JobKind) -> Self {
        Self {
            job: JobConfig {
                name: name.to_string(),
                kind,
                format: SpecFormat::Job,
                uses: None,
                after: vec![],
                reads: vec![],
                writes: vec![],
                caches: vec![],
                args: IndexMap::new(),
                jvm_args: IndexMap::new(),
                parameters: IndexMap::new(),
            },
        }
    }

    pub fn command(name: &str, cmd: &str) -> Self {
        Self::new(name, JobKind::Command).uses(cmd)
    }

    pub fn properties(mut self) -> Self {
        self.job.format = SpecFormat::Properties;
        self
    }

    pub fn uses(mut self, value: &str) -> Self {
        self.job.uses = Some(value.to_string());
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.job.after.push(dep.to_string());
        self
    }

    pub fn reads(mut self, path: &str) -> Self {
        self.job.reads.push(LockConfig::Path(path.to_string()));
        self
    }

    pub fn reads_as(mut self, path: &str, alias: &str) -> Self {
        self.job.reads.push(LockConfig::Detailed {
            path: path.to_string(),
            alias: Some(alias.to_string()),
        });
        self
    }

    pub fn writes(mut self, path: &str) -> Self {
        self.job.writes.push(LockConfig::Path(path.to_string()));
        self
    }

    pub fn caches(mut self, path: &str, alias: &str) -> Self {
        self.job.caches.push(CacheConfig {
            path: path.to_string(),
            alias: alias.to_string(),
        });
        self
    }

    pub fn arg(mut self, key: &str, value: &str) -> Self {
        self.job
            .args
            .insert(key.to_string(), ScalarValue::String(value.to_string()));
        self
    }

    pub fn jvm_arg(mut self, key: &str, value: &str) -> Self {
        self.job
            .jvm_args
            .insert(key.to_string(), ScalarValue::String(value.to_string()));
        self
    }

    pub fn parameter(mut self, key: &str, value: &str) -> Self {
        self.job
            .parameters
            .insert(key.to_string(), ScalarValue::String(value.to_string()));
        self
    }

    pub fn build(self) -> JobConfig {
        self.job
    }
}

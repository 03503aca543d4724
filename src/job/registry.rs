// src/job/registry.rs

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::debug;

use crate::errors::{AzkabanError, Result};
use crate::job::spec::{CACHE_FILES_KEY, CACHE_SYMLINK_KEY, JobSpec, LockOptions};
use crate::task::{TaskId, TaskRegistry};
use crate::types::{JobKind, SpecFormat};

/// Build-wide settings fixed before any job is declared.
#[derive(Debug, Clone)]
pub struct JobDefaults {
    /// Directory every job file is written into.
    pub output_dir: PathBuf,
    /// JVM arguments each spec starts from the first time its JVM args are
    /// touched. Cloned per spec.
    pub jvm_args: IndexMap<String, String>,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("conf/"),
            jvm_args: IndexMap::new(),
        }
    }
}

/// Owns the task namespace and the side-table of job specs attached to it.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    defaults: JobDefaults,
    tasks: TaskRegistry,
    jobs: IndexMap<TaskId, JobSpec>,
}

impl JobRegistry {
    pub fn new(defaults: JobDefaults) -> Self {
        Self {
            defaults,
            tasks: TaskRegistry::new(),
            jobs: IndexMap::new(),
        }
    }

    pub fn defaults(&self) -> &JobDefaults {
        &self.defaults
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    /// Declare an executable job (`.job` file).
    pub fn declare<I, S>(
        &mut self,
        kind: JobKind,
        qualified_name: &str,
        prerequisites: I,
    ) -> Result<JobBuilder<'_>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare_with_format(kind, SpecFormat::Job, qualified_name, prerequisites)
    }

    /// Declare a plain properties file (`.properties`).
    pub fn declare_props<I, S>(
        &mut self,
        qualified_name: &str,
        prerequisites: I,
    ) -> Result<JobBuilder<'_>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare_with_format(
            JobKind::Generic,
            SpecFormat::Properties,
            qualified_name,
            prerequisites,
        )
    }

    pub fn declare_with_format<I, S>(
        &mut self,
        kind: JobKind,
        format: SpecFormat,
        qualified_name: &str,
        prerequisites: I,
    ) -> Result<JobBuilder<'_>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prerequisites: Vec<String> = prerequisites.into_iter().map(Into::into).collect();
        let id = self.tasks.register(qualified_name, prerequisites.clone())?;
        let spec = JobSpec::new(
            id,
            self.tasks.name(id),
            self.tasks.scope(id),
            kind,
            format,
            prerequisites,
        );
        debug!(job = %spec.name(), %kind, "declared job");
        self.jobs.insert(id, spec);
        self.builder(id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// All specs in declaration order.
    pub fn specs(&self) -> impl Iterator<Item = &JobSpec> {
        self.jobs.values()
    }

    pub fn spec(&self, id: TaskId) -> Option<&JobSpec> {
        self.jobs.get(&id)
    }

    pub fn spec_by_name(&self, qualified_name: &str) -> Option<&JobSpec> {
        self.tasks.get(qualified_name).and_then(|id| self.jobs.get(&id))
    }

    /// Reopen a declared spec for further configuration.
    pub fn builder(&mut self, id: TaskId) -> Result<JobBuilder<'_>> {
        let spec = self.jobs.get_mut(&id).ok_or_else(|| {
            AzkabanError::ConfigError(format!("no job attached to task #{}", id.index()))
        })?;
        Ok(JobBuilder {
            spec,
            defaults: &self.defaults,
        })
    }

    pub fn set_arguments<I, K, V>(&mut self, id: TaskId, mapping: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.builder(id)?.set(mapping);
        Ok(())
    }

    pub fn set_jvm_args<I, K, V>(&mut self, id: TaskId, mapping: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.builder(id)?.jvm_args(mapping);
        Ok(())
    }

    pub fn declare_read(&mut self, id: TaskId, resource: &str, options: &LockOptions) -> Result<()> {
        self.builder(id)?.reads_with(resource, options);
        Ok(())
    }

    pub fn declare_write(&mut self, id: TaskId, resource: &str, options: &LockOptions) -> Result<()> {
        self.builder(id)?.writes_with(resource, options);
        Ok(())
    }

    pub fn declare_cache(&mut self, id: TaskId, resource: &str, alias: &str) -> Result<()> {
        self.builder(id)?.caches(resource, alias);
        Ok(())
    }
}

/// Mutable handle on one spec during declaration.
///
/// Exposes exactly the declaration operations; everything else about the
/// spec is read through [`JobSpec`].
#[derive(Debug)]
pub struct JobBuilder<'a> {
    spec: &'a mut JobSpec,
    defaults: &'a JobDefaults,
}

impl<'a> JobBuilder<'a> {
    pub fn id(&self) -> TaskId {
        self.spec.task()
    }

    pub fn spec(&self) -> &JobSpec {
        &*self.spec
    }

    /// Merge arguments, overwriting existing keys in place.
    pub fn set<I, K, V>(&mut self, mapping: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in mapping {
            self.spec.set_argument(k, v);
        }
        self
    }

    /// Merge JVM system properties, starting from the default template on
    /// first use.
    pub fn jvm_args<I, K, V>(&mut self, mapping: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let jvm = self.spec.jvm_args_mut(&self.defaults.jvm_args);
        for (k, v) in mapping {
            jvm.insert(k.into(), v.into());
        }
        self
    }

    pub fn reads(&mut self, resource: &str) -> &mut Self {
        self.reads_with(resource, &LockOptions::default())
    }

    pub fn reads_with(&mut self, resource: &str, options: &LockOptions) -> &mut Self {
        self.spec.push_read(resource, options);
        self
    }

    pub fn writes(&mut self, resource: &str) -> &mut Self {
        self.writes_with(resource, &LockOptions::default())
    }

    pub fn writes_with(&mut self, resource: &str, options: &LockOptions) -> &mut Self {
        self.spec.push_write(resource, options);
        self
    }

    /// Read `resource` and ship it through the distributed cache as `alias`.
    pub fn caches(&mut self, resource: &str, alias: &str) -> &mut Self {
        let token = format!("{resource}#{alias}");
        {
            let jvm = self.spec.jvm_args_mut(&self.defaults.jvm_args);
            jvm.insert(CACHE_SYMLINK_KEY.to_string(), "yes".to_string());
            match jvm.get_mut(CACHE_FILES_KEY) {
                Some(files) => {
                    files.push(',');
                    files.push_str(&token);
                }
                None => {
                    jvm.insert(CACHE_FILES_KEY.to_string(), token);
                }
            }
        }
        self.reads(resource)
    }

    /// Set the job's primary resource (script, class or command line).
    pub fn uses(&mut self, value: &str) -> Result<&mut Self> {
        self.spec.set_primary_resource(value)?;
        Ok(self)
    }

    /// Pig only: set `param.<key>` for every entry.
    pub fn parameter<I, K, V>(&mut self, mapping: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if self.spec.kind() != JobKind::Pig {
            return Err(AzkabanError::ConfigError(format!(
                "job '{}' is not a pig job; script parameters are not supported",
                self.spec.name()
            )));
        }
        for (k, v) in mapping {
            let (k, v) = (k.into(), v.into());
            self.spec.set_argument(format!("param.{k}"), v.clone());
            self.spec.record_parameter(k, v);
        }
        Ok(self)
    }
}

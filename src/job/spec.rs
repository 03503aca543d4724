// src/job/spec.rs

//! The job specification itself.

use indexmap::IndexMap;

use crate::errors::{AzkabanError, Result};
use crate::job::variant::variant_for;
use crate::task::{SCOPE_SEPARATOR, TaskId};
use crate::types::{JobKind, SpecFormat};

/// JVM flag that makes distributed-cache entries visible as symlinks.
pub const CACHE_SYMLINK_KEY: &str = "mapred.create.symlink";
/// JVM argument collecting `resource#alias` distributed-cache entries.
pub const CACHE_FILES_KEY: &str = "mapred.cache.files";

/// Options attached to a single `reads` / `writes` declaration.
///
/// How (and whether) they are interpreted depends on the job kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockOptions {
    /// Name under which the resource is exposed to the job
    /// (`{ as = "input" }` in a job file).
    pub alias: Option<String>,
}

impl LockOptions {
    pub fn aliased(alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
        }
    }
}

/// One schedulable unit of work plus its configuration key/value pairs.
#[derive(Debug, Clone)]
pub struct JobSpec {
    task: TaskId,
    name: String,
    scope: Vec<String>,
    kind: JobKind,
    format: SpecFormat,
    arguments: IndexMap<String, String>,
    read_locks: Vec<String>,
    write_locks: Vec<String>,
    jvm_args: Option<IndexMap<String, String>>,
    primary_resource: Option<String>,
    parameters: IndexMap<String, String>,
    prerequisites: Vec<String>,
}

impl JobSpec {
    /// Create a spec for an already-registered task and apply the kind's
    /// argument defaults.
    pub(crate) fn new(
        task: TaskId,
        name: &str,
        scope: &[String],
        kind: JobKind,
        format: SpecFormat,
        prerequisites: Vec<String>,
    ) -> Self {
        let mut spec = Self {
            task,
            name: name.to_string(),
            scope: scope.to_vec(),
            kind,
            format,
            arguments: IndexMap::new(),
            read_locks: Vec::new(),
            write_locks: Vec::new(),
            jvm_args: None,
            primary_resource: None,
            parameters: IndexMap::new(),
            prerequisites,
        };
        for (k, v) in variant_for(kind).default_args {
            spec.set_argument(*k, *v);
        }
        spec
    }

    pub fn task(&self) -> TaskId {
        self.task
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualified name with scope separators flattened, e.g. `etl-daily-load`.
    pub fn flat_name(&self) -> String {
        flatten_name(&self.name)
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn format(&self) -> SpecFormat {
        self.format
    }

    pub fn arguments(&self) -> &IndexMap<String, String> {
        &self.arguments
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(|s| s.as_str())
    }

    pub fn read_locks(&self) -> &[String] {
        &self.read_locks
    }

    pub fn write_locks(&self) -> &[String] {
        &self.write_locks
    }

    pub fn lock_count(&self) -> usize {
        self.read_locks.len() + self.write_locks.len()
    }

    pub fn jvm_args(&self) -> Option<&IndexMap<String, String>> {
        self.jvm_args.as_ref()
    }

    pub fn primary_resource(&self) -> Option<&str> {
        self.primary_resource.as_deref()
    }

    pub fn parameters(&self) -> &IndexMap<String, String> {
        &self.parameters
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    pub(crate) fn set_argument(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.arguments.insert(key.into(), value.into());
    }

    pub(crate) fn record_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    pub(crate) fn push_read(&mut self, resource: &str, options: &LockOptions) {
        self.read_locks.push(resource.to_string());
        (variant_for(self.kind).lock_options)(self, resource, options);
    }

    pub(crate) fn push_write(&mut self, resource: &str, options: &LockOptions) {
        self.write_locks.push(resource.to_string());
        (variant_for(self.kind).lock_options)(self, resource, options);
    }

    /// JVM args for this spec, cloned from `template` the first time they
    /// are touched.
    pub(crate) fn jvm_args_mut(
        &mut self,
        template: &IndexMap<String, String>,
    ) -> &mut IndexMap<String, String> {
        self.jvm_args.get_or_insert_with(|| template.clone())
    }

    pub(crate) fn set_primary_resource(&mut self, value: &str) -> Result<()> {
        let Some(key) = variant_for(self.kind).uses_key else {
            return Err(AzkabanError::ConfigError(format!(
                "job '{}' of kind {} has no primary resource to set with `uses`",
                self.name, self.kind
            )));
        };
        self.primary_resource = Some(value.to_string());
        self.set_argument(key, value);
        Ok(())
    }
}

/// Replace every scope separator with `-` so the name is usable as a file
/// name and as an Azkaban dependency token.
pub fn flatten_name(name: &str) -> String {
    name.replace(SCOPE_SEPARATOR, "-")
}

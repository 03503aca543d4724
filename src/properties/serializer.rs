// src/properties/serializer.rs

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::errors::{AzkabanError, Result};
use crate::job::JobSpec;
use crate::job::spec::flatten_name;
use crate::task::DependencyResolver;

pub const READ_LOCK_KEY: &str = "read.lock";
pub const WRITE_LOCK_KEY: &str = "write.lock";
pub const DEPENDENCIES_KEY: &str = "dependencies";
pub const JVM_ARGS_KEY: &str = "jvm.args";

/// A rendered job file, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesFile {
    pub file_name: String,
    pub content: String,
}

/// Render `spec` into its job file.
///
/// Returns `Ok(None)` for a spec without arguments: such specs are no-ops
/// and never produce a file. Prerequisites are resolved through `resolver`
/// from the spec's own scope; any unresolved name fails the whole spec.
///
/// The spec itself is not modified, so rendering is repeatable.
pub fn serialize<R>(spec: &JobSpec, resolver: &R) -> Result<Option<PropertiesFile>>
where
    R: DependencyResolver + ?Sized,
{
    if spec.arguments().is_empty() {
        debug!(job = %spec.name(), "job has no arguments; skipping");
        return Ok(None);
    }

    let file_name = format!("{}{}", spec.flat_name(), spec.format().extension());
    let mut props = spec.arguments().clone();

    if !spec.prerequisites().is_empty() {
        let deps = spec
            .prerequisites()
            .iter()
            .map(|prereq| {
                resolver
                    .resolve_name(prereq, spec.scope())
                    .map(|name| flatten_name(&name))
                    .ok_or_else(|| AzkabanError::UnresolvedDependency {
                        job: spec.name().to_string(),
                        dependency: prereq.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        props.insert(DEPENDENCIES_KEY.to_string(), deps.join(","));
    }

    if let Some(jvm) = spec.jvm_args().filter(|jvm| !jvm.is_empty()) {
        match props.get(JVM_ARGS_KEY) {
            Some(manual) => warn!(
                job = %spec.name(),
                jvm_args = %manual,
                "both `jvm.args` and JVM properties are set; keeping the explicit `jvm.args`"
            ),
            None => {
                props.insert(JVM_ARGS_KEY.to_string(), render_jvm_args(jvm));
            }
        }
    }

    let content = render(spec.read_locks(), spec.write_locks(), &props);
    Ok(Some(PropertiesFile { file_name, content }))
}

/// `-Dkey=value` for every entry, space separated, in insertion order.
pub fn render_jvm_args(jvm: &IndexMap<String, String>) -> String {
    jvm.iter()
        .map(|(k, v)| format!("-D{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render(read_locks: &[String], write_locks: &[String], props: &IndexMap<String, String>) -> String {
    let mut out = String::new();
    if !read_locks.is_empty() {
        push_line(&mut out, READ_LOCK_KEY, &read_locks.join(","));
    }
    if !write_locks.is_empty() {
        push_line(&mut out, WRITE_LOCK_KEY, &write_locks.join(","));
    }
    for (k, v) in props {
        push_line(&mut out, k, v);
    }
    out
}

fn push_line(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push('=');
    out.push_str(value);
    out.push('\n');
}

// src/job/variant.rs

//! Per-kind behaviour, looked up by [`JobKind`].

use crate::job::spec::{JobSpec, LockOptions};
use crate::types::JobKind;

/// Hook invoked after a read or write lock is appended.
pub type LockOptionHandler = fn(&mut JobSpec, &str, &LockOptions);

/// Static description of one job kind.
#[derive(Debug)]
pub struct Variant {
    /// Arguments every spec of this kind starts with.
    pub default_args: &'static [(&'static str, &'static str)],
    /// Argument written by `uses`; `None` if the kind has no primary resource.
    pub uses_key: Option<&'static str>,
    pub lock_options: LockOptionHandler,
    /// Graph fill color for task nodes of this kind (empty = unfilled).
    pub fill_color: &'static str,
}

static GENERIC: Variant = Variant {
    default_args: &[],
    uses_key: None,
    lock_options: ignore_options,
    fill_color: "",
};

static PIG: Variant = Variant {
    default_args: &[("type", "pig")],
    uses_key: Some("pig.script"),
    lock_options: pig_options,
    fill_color: "#e7a5a5",
};

static JAVA: Variant = Variant {
    default_args: &[("type", "java")],
    uses_key: Some("job.class"),
    lock_options: java_options,
    fill_color: "#E7C6A5",
};

static JAVA_PROCESS: Variant = Variant {
    default_args: &[("type", "java")],
    uses_key: Some("java.class"),
    lock_options: ignore_options,
    fill_color: "",
};

static COMMAND: Variant = Variant {
    default_args: &[("type", "command")],
    uses_key: Some("command"),
    lock_options: ignore_options,
    fill_color: "#e7e6a5",
};

static VOLDEMORT_BUILD_AND_PUSH: Variant = Variant {
    default_args: &[("type", "VoldemortBuildandPush")],
    uses_key: None,
    lock_options: ignore_options,
    fill_color: "",
};

pub fn variant_for(kind: JobKind) -> &'static Variant {
    match kind {
        JobKind::Generic => &GENERIC,
        JobKind::Pig => &PIG,
        JobKind::Java => &JAVA,
        JobKind::JavaProcess => &JAVA_PROCESS,
        JobKind::Command => &COMMAND,
        JobKind::VoldemortBuildAndPush => &VOLDEMORT_BUILD_AND_PUSH,
    }
}

fn ignore_options(_spec: &mut JobSpec, _resource: &str, _options: &LockOptions) {}

/// `{ as = "x" }` becomes the script parameter `param.x=<resource>`.
fn pig_options(spec: &mut JobSpec, resource: &str, options: &LockOptions) {
    if let Some(alias) = &options.alias {
        spec.set_argument(format!("param.{alias}"), resource);
        spec.record_parameter(alias.clone(), resource);
    }
}

/// `{ as = "x" }` becomes the bare argument `x=<resource>`.
fn java_options(spec: &mut JobSpec, resource: &str, options: &LockOptions) {
    if let Some(alias) = &options.alias {
        spec.set_argument(alias.clone(), resource);
    }
}

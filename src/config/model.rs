// src/config/model.rs

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::types::{DeployProtocol, JobKind, SpecFormat};

/// Top-level job definition file as read from TOML (before validation).
///
/// ```toml
/// [config]
/// output_dir = "conf/"
///
/// [config.default_jvm_args]
/// "java.io.tmpdir" = "/tmp"
///
/// [deploy]
/// protocol = "session"
/// endpoint = "https://azkaban.example.com/manager"
/// project = "etl"
///
/// [[job]]
/// name = "etl:load"
/// kind = "pig"
/// uses = "src/load.pig"
/// reads = ["input/raw.txt", { path = "input/lookup.txt", as = "lookup" }]
/// writes = ["output/loaded"]
/// ```
///
/// Jobs are an array of tables so declaration order is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub deploy: DeploySection,

    #[serde(default)]
    pub job: Vec<JobConfig>,
}

/// Validated job definition file. Construct via `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub deploy: DeploySection,
    pub job: Vec<JobConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        deploy: DeploySection,
        job: Vec<JobConfig>,
    ) -> Self {
        Self { config, deploy, job }
    }
}

/// `[config]` section: build-wide defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Directory job files are written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Draw prerequisite edges between task nodes in `graph` output.
    #[serde(default)]
    pub include_task_edges: bool,

    /// JVM properties every job starts from once it sets any JVM property.
    #[serde(default)]
    pub default_jvm_args: IndexMap<String, ScalarValue>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("conf/")
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            include_task_edges: false,
            default_jvm_args: IndexMap::new(),
        }
    }
}

/// `[deploy]` section. Every field can be overridden on the command line.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploySection {
    #[serde(default)]
    pub protocol: DeployProtocol,

    #[serde(default)]
    pub endpoint: Option<String>,

    /// Target project (session protocol).
    #[serde(default)]
    pub project: Option<String>,

    /// Target path (redirect protocol).
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,

    /// Accept any TLS certificate. Only for servers with self-signed
    /// certificates you cannot fix.
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,
}

fn default_upload_timeout_secs() -> u64 {
    1200
}

impl Default for DeploySection {
    fn default() -> Self {
        Self {
            protocol: DeployProtocol::default(),
            endpoint: None,
            project: None,
            path: None,
            username: None,
            upload_timeout_secs: default_upload_timeout_secs(),
            insecure_skip_tls_verify: false,
        }
    }
}

/// One `[[job]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Qualified name, e.g. `"etl:daily:load"`.
    pub name: String,

    #[serde(default)]
    pub kind: JobKind,

    /// `"job"` (default) or `"properties"`.
    #[serde(default)]
    pub format: SpecFormat,

    /// Primary resource: pig script, java class or command line.
    #[serde(default)]
    pub uses: Option<String>,

    /// Prerequisite job names, resolved from this job's scope outward.
    #[serde(default)]
    pub after: Vec<String>,

    #[serde(default)]
    pub reads: Vec<LockConfig>,

    #[serde(default)]
    pub writes: Vec<LockConfig>,

    /// Resources shipped through the distributed cache.
    #[serde(default)]
    pub caches: Vec<CacheConfig>,

    #[serde(default)]
    pub args: IndexMap<String, ScalarValue>,

    #[serde(default)]
    pub jvm_args: IndexMap<String, ScalarValue>,

    /// Pig script parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, ScalarValue>,
}

/// A lock entry: either a bare resource name or `{ path, as }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LockConfig {
    Path(String),
    Detailed {
        path: String,
        #[serde(default, rename = "as")]
        alias: Option<String>,
    },
}

impl LockConfig {
    pub fn path(&self) -> &str {
        match self {
            LockConfig::Path(p) => p,
            LockConfig::Detailed { path, .. } => path,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            LockConfig::Path(_) => None,
            LockConfig::Detailed { alias, .. } => alias.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheConfig {
    pub path: String,
    #[serde(rename = "as")]
    pub alias: String,
}

/// A TOML scalar used as a property value; rendered with `Display`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::String(s) => f.write_str(s),
            ScalarValue::Integer(i) => write!(f, "{i}"),
            ScalarValue::Float(x) => write!(f, "{x:?}"),
            ScalarValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Render a scalar map to plain strings, keeping order.
pub fn stringify(map: &IndexMap<String, ScalarValue>) -> IndexMap<String, String> {
    map.iter().map(|(k, v)| (k.clone(), v.to_string())).collect()
}

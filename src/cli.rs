// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;
use crate::types::DeployProtocol;

/// Command-line arguments for `azkaban-jobs`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "azkaban-jobs",
    version,
    about = "Generate Azkaban job files, graph their data locks and deploy them.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job definition file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path(), global = true)]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `AZKABAN_JOBS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write one job file per declared job into the output directory.
    Build(BuildArgs),
    /// Print the task/data lock graph as Graphviz DOT.
    Graph(GraphArgs),
    /// Upload a job archive to an Azkaban server.
    Deploy(DeployArgs),
}

#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// Print the files that would be written instead of writing them.
    #[arg(long)]
    pub dry_run: bool,

    /// Override `[config].output_dir`.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct GraphArgs {
    /// Only include jobs in this namespace (repeatable).
    #[arg(long = "namespace", value_name = "NS")]
    pub namespaces: Vec<String>,

    /// Also draw prerequisite edges between jobs.
    #[arg(long)]
    pub task_edges: bool,

    /// Graph title.
    #[arg(long, default_value = "jobs")]
    pub name: String,

    /// Write DOT here instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct DeployArgs {
    /// ZIP archive of job files to upload.
    #[arg(long, value_name = "ZIP")]
    pub archive: PathBuf,

    /// Override `[deploy].endpoint`.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Override `[deploy].protocol`.
    #[arg(long, value_enum)]
    pub protocol: Option<DeployProtocol>,

    /// Target project (session protocol).
    #[arg(long)]
    pub project: Option<String>,

    /// Target path (redirect protocol).
    #[arg(long)]
    pub path: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long, env = "AZKABAN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Override `[deploy].upload_timeout_secs`.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Accept invalid TLS certificates.
    #[arg(long)]
    pub insecure: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

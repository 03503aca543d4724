// src/lib.rs

pub mod cli;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod job;
pub mod logging;
pub mod properties;
pub mod task;
pub mod types;

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::cli::{BuildArgs, CliArgs, Command, DeployArgs, GraphArgs};
use crate::config::{ConfigFile, ConfigSection, DeploySection, load_and_validate, load_registry};
use crate::deploy::{DeployOptions, RedirectDeployer, SessionDeployer};
use crate::errors::{AzkabanError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::graph::{DotSink, GraphOptions, GraphStyle, LockGraph};
use crate::job::check_acyclic;
use crate::properties::{PropertiesWriter, render_all};
use crate::types::DeployProtocol;

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.as_path();
    match &args.command {
        Command::Build(build) => run_build(config_path, build),
        Command::Graph(graph) => run_graph(config_path, graph),
        Command::Deploy(deploy) => run_deploy(config_path, deploy).await,
    }
}

fn run_build(config_path: &Path, args: &BuildArgs) -> Result<()> {
    let (_cfg, registry) = load_registry(config_path)?;
    check_acyclic(&registry)?;

    if args.dry_run {
        print_dry_run(&render_all(&registry)?);
        return Ok(());
    }

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| registry.defaults().output_dir.clone());
    let writer = PropertiesWriter::new(RealFileSystem, output_dir);
    let written = writer.write_all(&registry)?;

    info!(
        files = written.len(),
        jobs = registry.len(),
        output_dir = %writer.output_dir().display(),
        "job files written"
    );
    Ok(())
}

fn run_graph(config_path: &Path, args: &GraphArgs) -> Result<()> {
    let (cfg, registry) = load_registry(config_path)?;

    let options = GraphOptions {
        namespaces: args.namespaces.clone(),
        include_task_edges: args.task_edges || cfg.config.include_task_edges,
    };
    let graph = LockGraph::build(&registry, &options);

    let mut sink = DotSink::new(&args.name);
    graph.render(&GraphStyle::default(), &mut sink);
    let dot = sink.finish();

    match &args.output {
        Some(path) => {
            RealFileSystem.write(path, dot.as_bytes())?;
            info!(path = %path.display(), nodes = graph.node_count(), "graph written");
        }
        None => print!("{dot}"),
    }
    Ok(())
}

async fn run_deploy(config_path: &Path, args: &DeployArgs) -> Result<()> {
    let cfg = load_deploy_config(config_path)?;
    let section = &cfg.deploy;

    let endpoint = require(args.endpoint.as_ref().or(section.endpoint.as_ref()), "endpoint")?;
    let protocol = args.protocol.unwrap_or(section.protocol);
    let options = DeployOptions {
        upload_timeout: Duration::from_secs(args.timeout_secs.unwrap_or(section.upload_timeout_secs)),
        insecure_skip_tls_verify: args.insecure || section.insecure_skip_tls_verify,
    };

    match protocol {
        DeployProtocol::Redirect => {
            let path = require(args.path.as_ref().or(section.path.as_ref()), "path")?;
            RedirectDeployer::new(&options)?
                .deploy(endpoint, path, &args.archive)
                .await
        }
        DeployProtocol::Session => {
            let project = require(args.project.as_ref().or(section.project.as_ref()), "project")?;
            let username = require(args.username.as_ref().or(section.username.as_ref()), "username")?;
            let password = args.password.as_deref().ok_or_else(|| {
                AzkabanError::ConfigError(
                    "deploy password not set (use --password or AZKABAN_PASSWORD)".to_string(),
                )
            })?;
            let deployer = SessionDeployer::new(&options)?;
            let session = deployer.authenticate(endpoint, username, password).await?;
            deployer
                .deploy_with_session(endpoint, project, &args.archive, &session)
                .await
        }
    }
}

/// Deploying does not need any jobs, so a missing file just means "no
/// `[deploy]` defaults".
fn load_deploy_config(config_path: &Path) -> Result<ConfigFile> {
    if config_path.exists() {
        return load_and_validate(config_path);
    }
    debug!(path = %config_path.display(), "no job file; using command-line deploy settings only");
    Ok(ConfigFile::new_unchecked(
        ConfigSection::default(),
        DeploySection::default(),
        Vec::new(),
    ))
}

fn require<'a>(value: Option<&'a String>, name: &str) -> Result<&'a str> {
    value.map(|s| s.as_str()).ok_or_else(|| {
        AzkabanError::ConfigError(format!(
            "deploy {name} not set (use --{name} or [deploy].{name})"
        ))
    })
}

/// Dry-run output: every file that `build` would write.
fn print_dry_run(files: &[properties::PropertiesFile]) {
    println!("azkaban-jobs dry-run ({} files)", files.len());
    for file in files {
        println!();
        println!("# {}", file.file_name);
        print!("{}", file.content);
    }
    debug!("dry-run complete (nothing written)");
}

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// The closed set of job kinds this crate knows how to describe.
///
/// Each kind maps to a fixed strategy entry in [`crate::job::variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    #[serde(alias = "job")]
    Generic,
    Pig,
    Java,
    JavaProcess,
    Command,
    VoldemortBuildAndPush,
}

impl Default for JobKind {
    fn default() -> Self {
        JobKind::Generic
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobKind::Generic => "generic",
            JobKind::Pig => "pig",
            JobKind::Java => "java",
            JobKind::JavaProcess => "java_process",
            JobKind::Command => "command",
            JobKind::VoldemortBuildAndPush => "voldemort_build_and_push",
        };
        f.write_str(s)
    }
}

impl FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generic" | "job" => Ok(JobKind::Generic),
            "pig" => Ok(JobKind::Pig),
            "java" => Ok(JobKind::Java),
            "java_process" => Ok(JobKind::JavaProcess),
            "command" => Ok(JobKind::Command),
            "voldemort_build_and_push" => Ok(JobKind::VoldemortBuildAndPush),
            other => Err(format!("invalid job kind: {other}")),
        }
    }
}

/// Which file a spec is written to.
///
/// - `Job`: an executable job file (`.job`).
/// - `Properties`: a shared properties file (`.properties`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecFormat {
    Job,
    Properties,
}

impl SpecFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SpecFormat::Job => ".job",
            SpecFormat::Properties => ".properties",
        }
    }
}

impl Default for SpecFormat {
    fn default() -> Self {
        SpecFormat::Job
    }
}

/// Upload protocol spoken by the target Azkaban server.
///
/// - `Redirect`: older servers; session-less upload answered with a 302
///   whose `Location` carries the outcome.
/// - `Session`: newer servers; explicit login returning a session id, then
///   an upload whose outcome is signalled through `Set-Cookie`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeployProtocol {
    Redirect,
    Session,
}

impl Default for DeployProtocol {
    fn default() -> Self {
        DeployProtocol::Session
    }
}

impl FromStr for DeployProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redirect" => Ok(DeployProtocol::Redirect),
            "session" => Ok(DeployProtocol::Session),
            other => Err(format!(
                "invalid deploy protocol: {other} (expected \"redirect\" or \"session\")"
            )),
        }
    }
}

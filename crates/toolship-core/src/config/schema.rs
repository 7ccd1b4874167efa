//! Configuration schema for toolship.toml
//!
//! Every section is optional. Missing values fall back to the defaults of the
//! review tool deployment on Toolforge.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

use crate::error::{DeployError, Result};
use crate::schedule::JobSpec;

/// Root configuration structure for toolship.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolshipConfig {
    pub release: ReleaseConfig,
    pub remote: RemoteConfig,
    pub tool: ToolConfig,
    pub service: ServiceConfig,
    pub schedule: ScheduleConfig,
}

/// Where releases are published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    pub org: String,
    pub repo: String,
    /// Asset file name attached to each release
    pub asset: String,
    /// Base URL of the release metadata API
    pub api_url: String,
    /// Base URL release assets are downloaded from
    pub download_url: String,
    /// Environment variable holding an optional API token
    pub token_env: Option<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            org: "cluebotng".to_string(),
            repo: "reviewng".to_string(),
            asset: "reviewng".to_string(),
            api_url: "https://api.github.com".to_string(),
            download_url: "https://github.com".to_string(),
            token_env: Some("GITHUB_TOKEN".to_string()),
        }
    }
}

/// The SSH host and the account commands run as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub host: String,
    /// Account that sudo switches to
    pub user: String,
    pub sudo_prefix: String,
    pub ssh_program: String,
    /// Extra arguments passed to ssh before the host
    pub ssh_args: Vec<String>,
    /// Connection timeout in seconds
    pub connect_timeout: Option<u32>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "login.tools.wmflabs.org".to_string(),
            user: "tools.cluebotng-review".to_string(),
            sudo_prefix: "/usr/bin/sudo -ni".to_string(),
            ssh_program: "ssh".to_string(),
            ssh_args: Vec::new(),
            connect_timeout: None,
        }
    }
}

/// Layout of the tool account's home directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Absolute POSIX path of the tool account's home on the remote host
    pub base_dir: String,
    /// Symlink name; defaults to the release asset name
    pub link_name: Option<String>,
    pub backup_dir: String,
    /// Database credentials file used by the backup job
    pub db_config: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            base_dir: "/data/project/cluebotng-review".to_string(),
            link_name: None,
            backup_dir: "mysql_backups".to_string(),
            db_config: "replica.my.cnf".to_string(),
        }
    }
}

/// The web service manager invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            command: "webservice".to_string(),
            args: vec!["--backend=kubernetes".to_string(), "golang1.11".to_string()],
        }
    }
}

/// Job runner settings and the job list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    pub jobs_file: String,
    /// Container image jobs run in
    pub image: String,
    /// Replaces the built-in job list when non-empty
    #[serde(rename = "job")]
    pub jobs: Vec<JobSpec>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            jobs_file: "jobs.yaml".to_string(),
            image: "bullseye".to_string(),
            jobs: Vec::new(),
        }
    }
}

impl ScheduleConfig {
    /// Configured jobs, or the built-in set when none are configured.
    pub fn effective_jobs(&self) -> Vec<JobSpec> {
        if self.jobs.is_empty() {
            crate::schedule::default_jobs()
        } else {
            self.jobs.clone()
        }
    }
}

impl ToolshipConfig {
    /// Symlink name under the base directory.
    pub fn link_name(&self) -> &str {
        self.tool
            .link_name
            .as_deref()
            .unwrap_or(&self.release.asset)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        require_non_empty("release.org", &self.release.org)?;
        require_non_empty("release.repo", &self.release.repo)?;
        require_non_empty("release.asset", &self.release.asset)?;
        require_http_url("release.api_url", &self.release.api_url)?;
        require_http_url("release.download_url", &self.release.download_url)?;

        require_non_empty("remote.host", &self.remote.host)?;
        require_non_empty("remote.user", &self.remote.user)?;
        require_non_empty("remote.sudo_prefix", &self.remote.sudo_prefix)?;
        require_non_empty("remote.ssh_program", &self.remote.ssh_program)?;

        if !self.tool.base_dir.starts_with('/') {
            return Err(DeployError::Config(format!(
                "tool.base_dir must be absolute: {}",
                self.tool.base_dir
            )));
        }
        require_relative("tool.link_name", self.link_name())?;
        require_relative("tool.backup_dir", &self.tool.backup_dir)?;
        require_relative("tool.db_config", &self.tool.db_config)?;
        require_relative("schedule.jobs_file", &self.schedule.jobs_file)?;
        require_non_empty("service.command", &self.service.command)?;

        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeployError::Config(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).map_err(|e| {
        DeployError::Config(format!("{} is not a valid URL ({}): {}", field, e, value))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DeployError::Config(format!(
            "{} must use http or https, got {}",
            field, other
        ))),
    }
}

fn require_relative(field: &str, value: &str) -> Result<()> {
    require_non_empty(field, value)?;
    let path = Path::new(value);
    if path.is_absolute() {
        return Err(DeployError::Config(format!(
            "{} must be relative to tool.base_dir: {}",
            field, value
        )));
    }
    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(DeployError::Config(format!(
            "{} must not contain '..': {}",
            field, value
        )));
    }
    Ok(())
}

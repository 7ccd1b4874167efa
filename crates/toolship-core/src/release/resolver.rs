//! Resolve the latest published release from the GitHub releases API.

use serde_json::Value;
use url::Url;

use super::ReleaseTag;
use crate::config::ReleaseConfig;
use crate::error::{DeployError, Result};

const USER_AGENT: &str = concat!("toolship/", env!("CARGO_PKG_VERSION"));

/// Something that can name the release to deploy.
pub trait ReleaseSource {
    fn latest_tag(&self) -> Result<ReleaseTag>;
}

/// A release pinned up front, e.g. from `--tag`.
#[derive(Debug, Clone)]
pub struct FixedRelease(pub ReleaseTag);

impl ReleaseSource for FixedRelease {
    fn latest_tag(&self) -> Result<ReleaseTag> {
        Ok(self.0.clone())
    }
}

/// Queries `GET /repos/{org}/{repo}/releases/latest`.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    api_url: String,
    org: String,
    repo: String,
    token: Option<String>,
}

impl GitHubReleases {
    pub fn new(
        api_url: impl Into<String>,
        org: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            org: org.into(),
            repo: repo.into(),
            token: None,
        }
    }

    /// Build from config, reading the token from `token_env` when it is set.
    pub fn from_config(config: &ReleaseConfig) -> Self {
        let token = config
            .token_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|token| !token.trim().is_empty());
        Self::new(&config.api_url, &config.org, &config.repo).with_token(token)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// URL of the latest-release endpoint.
    pub fn latest_release_url(&self) -> Result<Url> {
        join_segments(
            &self.api_url,
            &[
                "repos",
                self.org.as_str(),
                self.repo.as_str(),
                "releases",
                "latest",
            ],
        )
    }

    /// Fetch the latest release tag (async).
    pub async fn fetch_latest_tag(&self) -> Result<ReleaseTag> {
        let url = self.latest_release_url()?;
        let release_error = |message: String| DeployError::Release {
            url: url.to_string(),
            message,
        };

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| release_error(format!("failed to build HTTP client: {}", e)))?;

        let mut request = client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| release_error(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(release_error(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| release_error(format!("failed to read response body: {}", e)))?;

        parse_latest_release(url.as_str(), &body)
    }
}

impl ReleaseSource for GitHubReleases {
    fn latest_tag(&self) -> Result<ReleaseTag> {
        let runtime = tokio::runtime::Runtime::new().map_err(|e| DeployError::Release {
            url: self.api_url.clone(),
            message: format!("failed to create tokio runtime: {}", e),
        })?;
        runtime.block_on(self.fetch_latest_tag())
    }
}

/// Extract `tag_name` from a latest-release response body.
pub fn parse_latest_release(url: &str, body: &str) -> Result<ReleaseTag> {
    let release_error = |message: String| DeployError::Release {
        url: url.to_string(),
        message,
    };

    let json: Value = serde_json::from_str(body)
        .map_err(|e| release_error(format!("response is not JSON: {}", e)))?;

    let tag = json
        .get("tag_name")
        .and_then(Value::as_str)
        .ok_or_else(|| release_error("response has no string tag_name".to_string()))?;

    ReleaseTag::new(tag)
}

/// Download URL of the release asset for `tag`.
pub fn artifact_url(config: &ReleaseConfig, tag: &ReleaseTag) -> Result<Url> {
    join_segments(
        &config.download_url,
        &[
            config.org.as_str(),
            config.repo.as_str(),
            "releases",
            "download",
            tag.as_str(),
            config.asset.as_str(),
        ],
    )
}

fn join_segments(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| DeployError::Config(format!("invalid base URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| DeployError::Config(format!("base URL cannot have a path: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

//! The deploy and restart flows.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::installer::{ArtifactInstaller, InstallOutcome};
use super::service::ServiceController;
use crate::config::ToolshipConfig;
use crate::error::Result;
use crate::layout::RemoteLayout;
use crate::release::{ReleaseSource, ReleaseTag, artifact_url};
use crate::remote::RemoteSession;
use crate::schedule::ScheduleRewriter;

/// What a deploy did.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub host: String,
    pub tag: ReleaseTag,
    pub artifact: String,
    pub outcome: InstallOutcome,
    pub restarted: bool,
    pub jobs_file: String,
    pub job_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Runs deploy steps in order against one session, stopping at the first
/// error.
#[derive(Debug)]
pub struct Deployer<'a> {
    config: &'a ToolshipConfig,
    layout: RemoteLayout,
}

impl<'a> Deployer<'a> {
    pub fn new(config: &'a ToolshipConfig) -> Self {
        Self {
            config,
            layout: RemoteLayout::from_config(config),
        }
    }

    pub fn layout(&self) -> &RemoteLayout {
        &self.layout
    }

    /// Download URL of the release asset.
    pub fn artifact_url(&self, tag: &ReleaseTag) -> Result<String> {
        Ok(artifact_url(&self.config.release, tag)?.to_string())
    }

    /// Render the job file without touching the host.
    pub fn render_schedule(&self) -> Result<String> {
        let (content, _) = self.schedule_rewriter().render()?;
        Ok(content)
    }

    /// Resolve the release, install it, restart when it is new, and rewrite
    /// the job schedule.
    ///
    /// Nothing is sent to `session` until the release is resolved and the
    /// job templates render.
    pub fn deploy(
        &self,
        release: &dyn ReleaseSource,
        session: &mut dyn RemoteSession,
    ) -> Result<DeployReport> {
        let started_at = Utc::now();

        let tag = release.latest_tag()?;
        let url = self.artifact_url(&tag)?;
        self.schedule_rewriter().render()?;

        tracing::info!(
            host = %session.host(),
            tag = %tag,
            "Moving {} to {}",
            self.config.link_name(),
            tag
        );

        let outcome = ArtifactInstaller::new(&self.layout).install(session, &tag, &url)?;

        let restarted = outcome.is_new();
        if restarted {
            self.restart(session)?;
        } else {
            tracing::info!("Release unchanged, not restarting");
        }

        let schedule = self.schedule_rewriter().rewrite(session)?;

        Ok(DeployReport {
            host: session.host().to_string(),
            artifact: self.layout.artifact(&tag),
            tag,
            outcome,
            restarted,
            jobs_file: schedule.jobs_file,
            job_count: schedule.job_count,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Stop and start the web service.
    pub fn restart(&self, session: &mut dyn RemoteSession) -> Result<()> {
        ServiceController::new(&self.config.service, &self.layout).restart(session)
    }

    fn schedule_rewriter(&self) -> ScheduleRewriter<'_> {
        ScheduleRewriter::new(&self.config.schedule, &self.layout)
    }
}

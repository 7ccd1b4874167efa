//! Replace the remote job definitions wholesale.

use super::render::{render_jobs, to_yaml};
use super::template::TemplateVars;
use crate::config::ScheduleConfig;
use crate::error::Result;
use crate::layout::RemoteLayout;
use crate::remote::{RemoteCommand, RemoteSession, shell_quote};

/// Result of a schedule rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleReport {
    pub jobs_file: String,
    pub job_count: usize,
}

/// Renders the job list and installs it on the remote host.
#[derive(Debug)]
pub struct ScheduleRewriter<'a> {
    config: &'a ScheduleConfig,
    layout: &'a RemoteLayout,
}

impl<'a> ScheduleRewriter<'a> {
    pub fn new(config: &'a ScheduleConfig, layout: &'a RemoteLayout) -> Self {
        Self { config, layout }
    }

    /// Render the job file locally. Fails before touching the host on any
    /// template error.
    pub fn render(&self) -> Result<(String, usize)> {
        let vars = TemplateVars::from_layout(self.layout);
        let jobs = render_jobs(&self.config.effective_jobs(), &self.config.image, &vars)?;
        Ok((to_yaml(&jobs), jobs.len()))
    }

    /// Overwrite the job file and have the job runner load it.
    ///
    /// Legacy crontab entries are cleared first so that jobs are never
    /// scheduled twice.
    pub fn rewrite(&self, session: &mut dyn RemoteSession) -> Result<ScheduleReport> {
        let (content, job_count) = self.render()?;
        let jobs_file = self.layout.jobs_file();
        let base_dir = shell_quote(self.layout.base_dir());

        session.sudo(&format!("mkdir -p {}", shell_quote(&self.layout.backup_dir())))?;

        tracing::info!("Clearing crontab entries");
        session.sudo("crontab -r || true")?;

        tracing::info!(jobs = job_count, file = %jobs_file, "Updating job entries");
        session.run(
            RemoteCommand::new(format!("cat > {}", shell_quote(&jobs_file))).with_stdin(content),
        )?;
        session.sudo(&format!(
            "XDG_CONFIG_HOME={} toolforge jobs load {}",
            base_dir,
            shell_quote(&jobs_file)
        ))?;

        Ok(ScheduleReport {
            jobs_file,
            job_count,
        })
    }
}

//! Remote filesystem layout under the tool's base directory.

use crate::config::ToolshipConfig;
use crate::release::ReleaseTag;

/// Paths derived from the base directory; all absolute POSIX paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLayout {
    base_dir: String,
    link_name: String,
    backup_dir: String,
    jobs_file: String,
    db_config: String,
}

impl RemoteLayout {
    pub fn from_config(config: &ToolshipConfig) -> Self {
        Self {
            base_dir: config.tool.base_dir.trim_end_matches('/').to_string(),
            link_name: config.link_name().to_string(),
            backup_dir: config.tool.backup_dir.clone(),
            jobs_file: config.schedule.jobs_file.clone(),
            db_config: config.tool.db_config.clone(),
        }
    }

    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    /// `<base>/releases`
    pub fn releases_dir(&self) -> String {
        self.join("releases")
    }

    /// `<base>/releases/<tag>`
    pub fn artifact(&self, tag: &ReleaseTag) -> String {
        format!("{}/{}", self.releases_dir(), tag)
    }

    /// The stable symlink the service runs.
    pub fn symlink(&self) -> String {
        self.join(&self.link_name)
    }

    pub fn backup_dir(&self) -> String {
        self.join(&self.backup_dir)
    }

    pub fn jobs_file(&self) -> String {
        self.join(&self.jobs_file)
    }

    pub fn db_config(&self) -> String {
        self.join(&self.db_config)
    }

    fn join(&self, relative: &str) -> String {
        format!("{}/{}", self.base_dir, relative.trim_matches('/'))
    }
}

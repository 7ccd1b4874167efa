//! Config store for locating and loading toolship.toml.

use std::path::PathBuf;

use super::{ToolshipConfig, parser, paths};

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    explicit: Option<PathBuf>,
    project_root: PathBuf,
    global_dir: PathBuf,
}

impl ConfigStore {
    /// Store rooted at the current directory and the user's config directory.
    pub fn from_env(explicit: Option<PathBuf>) -> anyhow::Result<Self> {
        let project_root = std::env::current_dir()?;
        let global_dir = paths::default_global_dir()?;
        Ok(Self::from_paths(explicit, project_root, global_dir))
    }

    pub fn from_paths(
        explicit: Option<PathBuf>,
        project_root: PathBuf,
        global_dir: PathBuf,
    ) -> Self {
        Self {
            explicit,
            project_root,
            global_dir,
        }
    }

    /// Resolve which source `load` will read.
    ///
    /// An explicit path is used even when it does not exist, so that a typo
    /// fails loudly instead of silently deploying with defaults.
    pub fn resolve(&self) -> ConfigSource {
        if let Some(path) = &self.explicit {
            return ConfigSource::File(path.clone());
        }
        paths::candidate_paths(&self.project_root, &self.global_dir)
            .into_iter()
            .find(|p| p.is_file())
            .map(ConfigSource::File)
            .unwrap_or(ConfigSource::Defaults)
    }

    pub fn load(&self) -> anyhow::Result<(ToolshipConfig, ConfigSource)> {
        let source = self.resolve();
        let config = match &source {
            ConfigSource::File(path) => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                parser::parse_toolship_toml(path)?
            }
            ConfigSource::Defaults => {
                tracing::debug!("No configuration file found, using defaults");
                ToolshipConfig::default()
            }
        };
        Ok((config, source))
    }
}

//! Config path resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "toolship.toml";

/// Candidate config files, most specific first.
pub fn candidate_paths(project_root: &Path, global_dir: &Path) -> Vec<PathBuf> {
    vec![
        project_root.join(CONFIG_FILE_NAME),
        global_dir.join(CONFIG_FILE_NAME),
    ]
}

/// Default global config directory (`~/.config/toolship` on Linux).
pub fn default_global_dir() -> anyhow::Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("toolship"))
}

//! Put a release binary in place and point the stable symlink at it.

use serde::Serialize;

use crate::error::Result;
use crate::layout::RemoteLayout;
use crate::release::ReleaseTag;
use crate::remote::{RemoteSession, shell_quote};

/// Owner and group may read and execute; others get nothing.
const ARTIFACT_MODE: &str = "550";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    /// The artifact was downloaded by this run.
    Installed,
    /// The artifact was already on the host.
    AlreadyPresent,
}

impl InstallOutcome {
    pub fn is_new(self) -> bool {
        self == InstallOutcome::Installed
    }
}

#[derive(Debug)]
pub struct ArtifactInstaller<'a> {
    layout: &'a RemoteLayout,
}

impl<'a> ArtifactInstaller<'a> {
    pub fn new(layout: &'a RemoteLayout) -> Self {
        Self { layout }
    }

    /// Ensure `releases/<tag>` exists, downloading it from `download_url`
    /// when missing, set its mode, then repoint the symlink.
    pub fn install(
        &self,
        session: &mut dyn RemoteSession,
        tag: &ReleaseTag,
        download_url: &str,
    ) -> Result<InstallOutcome> {
        let releases_dir = shell_quote(&self.layout.releases_dir());
        let target = self.layout.artifact(tag);
        let target_q = shell_quote(&target);

        session.sudo(&format!("mkdir -p {}", releases_dir))?;

        let present = session.probe(&format!("test -f {}", target_q))?;
        let outcome = if present {
            tracing::info!(tag = %tag, "Release already present, skipping download");
            InstallOutcome::AlreadyPresent
        } else {
            tracing::info!(tag = %tag, url = %download_url, "Downloading release");
            // Download beside the target so a failed transfer never leaves a
            // file that a later run would take as installed.
            let partial = shell_quote(&format!("{}.partial", target));
            session.sudo(&format!(
                "wget -q -O {partial} {url} && mv -f {partial} {target}",
                partial = partial,
                url = shell_quote(download_url),
                target = target_q
            ))?;
            InstallOutcome::Installed
        };

        // Also when already present; an earlier run may have stopped before this.
        session.sudo(&format!("chmod {} {}", ARTIFACT_MODE, target_q))?;

        self.relink(session, tag)?;
        Ok(outcome)
    }

    /// Point the symlink at `releases/<tag>`.
    ///
    /// The new link is created beside the old one and renamed over it, so
    /// the symlink path never goes missing.
    pub fn relink(&self, session: &mut dyn RemoteSession, tag: &ReleaseTag) -> Result<()> {
        let symlink = self.layout.symlink();
        tracing::info!(link = %symlink, tag = %tag, "Updating symlink");
        session.sudo(&format!(
            "ln -sfn {target} {staged} && mv -Tf {staged} {link}",
            target = shell_quote(&self.layout.artifact(tag)),
            staged = shell_quote(&format!("{}.new", symlink)),
            link = shell_quote(&symlink)
        ))?;
        Ok(())
    }
}

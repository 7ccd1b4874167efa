//! Web service restarts.

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::layout::RemoteLayout;
use crate::remote::{RemoteSession, shell_join};

/// Drives the remote service manager with stop then start.
#[derive(Debug)]
pub struct ServiceController<'a> {
    config: &'a ServiceConfig,
    layout: &'a RemoteLayout,
}

impl<'a> ServiceController<'a> {
    pub fn new(config: &'a ServiceConfig, layout: &'a RemoteLayout) -> Self {
        Self { config, layout }
    }

    /// `<command> <args...> <verb> <symlink>`
    pub fn command_for(&self, verb: &str) -> String {
        let symlink = self.layout.symlink();
        let words = std::iter::once(self.config.command.as_str())
            .chain(self.config.args.iter().map(String::as_str))
            .chain([verb, symlink.as_str()]);
        shell_join(words)
    }

    pub fn restart(&self, session: &mut dyn RemoteSession) -> Result<()> {
        tracing::info!(host = %session.host(), "Restarting webservice");
        session.sudo(&self.command_for("stop"))?;
        session.sudo(&self.command_for("start"))?;
        Ok(())
    }
}

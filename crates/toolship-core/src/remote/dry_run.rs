//! A session that prints commands instead of running them.

use super::{CommandOutput, RemoteCommand, RemoteSession};
use crate::error::Result;

/// Logs every command and reports success.
///
/// Probes report `false` so that a dry run shows the full install plan.
#[derive(Debug, Default)]
pub struct DryRunSession {
    host: String,
    commands: Vec<RemoteCommand>,
}

impl DryRunSession {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            commands: Vec::new(),
        }
    }

    /// Commands seen so far, in order.
    pub fn commands(&self) -> &[RemoteCommand] {
        &self.commands
    }
}

impl RemoteSession for DryRunSession {
    fn exec(&mut self, command: &RemoteCommand) -> Result<CommandOutput> {
        match &command.stdin {
            Some(stdin) => tracing::info!(
                host = %self.host,
                bytes = stdin.len(),
                "[dry-run] {} <<< (stdin)",
                command.script
            ),
            None => tracing::info!(host = %self.host, "[dry-run] {}", command.script),
        }
        self.commands.push(command.clone());
        Ok(CommandOutput::success())
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn probe(&mut self, script: &str) -> Result<bool> {
        self.exec(&RemoteCommand::new(script))?;
        Ok(false)
    }
}

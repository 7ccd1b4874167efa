//! The remote execution seam.

use super::{CommandOutput, RemoteCommand};
use crate::error::{DeployError, ExitCode, Result};

/// A privileged command channel to one remote host.
///
/// Implementations run every command as the configured tool account.
pub trait RemoteSession {
    /// Run `command` and return its output whatever the exit status.
    fn exec(&mut self, command: &RemoteCommand) -> Result<CommandOutput>;

    /// Host this session is bound to, for log messages.
    fn host(&self) -> &str;

    /// Run `command`, failing on a non-zero exit.
    fn run(&mut self, command: RemoteCommand) -> Result<CommandOutput> {
        let output = self.exec(&command)?;
        if !output.status.success() {
            return Err(DeployError::RemoteCommand {
                command: command.script,
                status: output.status,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }

    /// Shorthand for [`RemoteSession::run`] without stdin.
    fn sudo(&mut self, script: &str) -> Result<CommandOutput> {
        self.run(RemoteCommand::new(script))
    }

    /// Run a test command: exit 0 is `true`, exit 1 is `false`, anything
    /// else is a failure.
    fn probe(&mut self, script: &str) -> Result<bool> {
        let command = RemoteCommand::new(script);
        let output = self.exec(&command)?;
        match output.status {
            ExitCode(Some(0)) => Ok(true),
            ExitCode(Some(1)) => Ok(false),
            status => Err(DeployError::RemoteCommand {
                command: command.script,
                status,
                stderr: output.stderr,
            }),
        }
    }
}

//! `RemoteSession` backed by the system `ssh` client.

use std::io::Write;
use std::process::{Command, Stdio};

use super::quote::shell_quote;
use super::{CommandOutput, RemoteCommand, RemoteSession};
use crate::config::RemoteConfig;
use crate::error::{DeployError, ExitCode, Result};

/// Runs each command as `ssh <host> <sudo prefix> -u <user> /bin/bash -c '<script>'`.
#[derive(Debug, Clone)]
pub struct SshSession {
    config: RemoteConfig,
}

impl SshSession {
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }

    /// The command line handed to the remote login shell.
    pub fn remote_command_line(&self, script: &str) -> String {
        format!(
            "{} -u {} /bin/bash -c {}",
            self.config.sudo_prefix,
            shell_quote(&self.config.user),
            shell_quote(script)
        )
    }

    /// Local `ssh` arguments, ending with the host and the remote command line.
    pub fn ssh_args(&self, script: &str) -> Vec<String> {
        let mut args = vec!["-o".to_string(), "BatchMode=yes".to_string()];
        if let Some(timeout) = self.config.connect_timeout {
            args.push("-o".to_string());
            args.push(format!("ConnectTimeout={}", timeout));
        }
        args.extend(self.config.ssh_args.iter().cloned());
        args.push(self.config.host.clone());
        args.push(self.remote_command_line(script));
        args
    }

    fn spawn_error(&self, source: std::io::Error) -> DeployError {
        DeployError::Spawn {
            program: self.config.ssh_program.clone(),
            source,
        }
    }
}

impl RemoteSession for SshSession {
    fn exec(&mut self, command: &RemoteCommand) -> Result<CommandOutput> {
        tracing::debug!(
            host = %self.config.host,
            script = %command.script,
            "Running remote command"
        );

        let mut child = Command::new(&self.config.ssh_program)
            .args(self.ssh_args(&command.script))
            .stdin(if command.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Feed stdin from a separate thread so a chatty remote cannot block us
        // on a full stdout pipe.
        let writer = match (child.stdin.take(), command.stdin.clone()) {
            (Some(mut stdin), Some(input)) => Some(std::thread::spawn(move || {
                stdin.write_all(input.as_bytes())
            })),
            _ => None,
        };

        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) if output.status.success() => return Err(self.spawn_error(e)),
                // The command failed anyway; its status is more useful.
                Ok(Err(_)) | Err(_) => {}
            }
        }

        let result = CommandOutput {
            status: ExitCode(output.status.code()),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(status = %result.status, "Remote command finished");
        Ok(result)
    }

    fn host(&self) -> &str {
        &self.config.host
    }
}

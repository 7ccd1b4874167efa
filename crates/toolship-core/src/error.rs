//! Error taxonomy for deploy operations.

use std::fmt;

/// Errors raised while resolving, installing, or rewriting a deployment.
///
/// Every variant aborts the invocation; nothing is retried or rolled back.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Release metadata could not be fetched or had an unexpected shape.
    #[error("Release lookup failed for {url}: {message}")]
    Release { url: String, message: String },

    /// The release tag cannot be used as a remote path component.
    #[error("Invalid release tag: {0:?}")]
    InvalidTag(String),

    /// A remote command exited non-zero.
    #[error("Remote command failed ({status}): {command}{}", stderr_suffix(.stderr))]
    RemoteCommand {
        command: String,
        status: ExitCode,
        stderr: String,
    },

    /// The local transport process could not be started.
    #[error("Failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Job template rendering failed.
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration values are unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = DeployError> = std::result::Result<T, E>;

/// Exit status of a remote command; `None` when killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub Option<i32>);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(Some(0));

    pub fn success(self) -> bool {
        self.0 == Some(0)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit {}", code),
            None => write!(f, "killed by signal"),
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}

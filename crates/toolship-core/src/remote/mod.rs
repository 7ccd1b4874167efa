//! Remote command execution over SSH.

pub mod command;
pub mod dry_run;
pub mod quote;
pub mod session;
pub mod ssh;

pub use command::{CommandOutput, RemoteCommand};
pub use dry_run::DryRunSession;
pub use quote::{shell_join, shell_quote};
pub use session::RemoteSession;
pub use ssh::SshSession;

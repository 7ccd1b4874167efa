//! Toolship Core Library
//!
//! Deploys a released binary to a tool account over SSH: resolves the latest
//! release, installs it beside earlier releases, repoints the stable
//! symlink, restarts the web service, and rewrites the job schedule.

pub mod config;
pub mod deploy;
pub mod error;
pub mod layout;
pub mod release;
pub mod remote;
pub mod schedule;

pub use error::{DeployError, ExitCode, Result};

//! Deploy coordination: install, restart, reschedule.

pub mod installer;
pub mod orchestrator;
pub mod service;

pub use installer::{ArtifactInstaller, InstallOutcome};
pub use orchestrator::{DeployReport, Deployer};
pub use service::ServiceController;

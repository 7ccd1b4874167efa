//! Scheduled job definitions for the remote job runner.

pub mod job;
pub mod render;
pub mod rewriter;
pub mod template;

pub use job::{JobSpec, default_jobs};
pub use render::{RenderedJob, render_jobs, to_yaml};
pub use rewriter::{ScheduleReport, ScheduleRewriter};
pub use template::{TemplateVars, interpolate};

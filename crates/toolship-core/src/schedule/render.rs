//! Render the job runner's YAML job list.

use std::collections::HashSet;
use std::fmt::Write as _;

use super::JobSpec;
use super::template::{TemplateVars, interpolate};
use crate::error::{DeployError, Result};

const HEADER: &str = "# Managed by toolship. Local edits are replaced on every deploy.";

/// A job with its command interpolated and defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedJob {
    pub name: String,
    pub command: String,
    pub image: String,
    pub schedule: String,
}

impl RenderedJob {
    fn log_stem(&self) -> String {
        self.name.replace('-', "_")
    }
}

/// Interpolate and validate `jobs`.
pub fn render_jobs(
    jobs: &[JobSpec],
    default_image: &str,
    vars: &TemplateVars,
) -> Result<Vec<RenderedJob>> {
    let mut seen = HashSet::new();
    let mut rendered = Vec::with_capacity(jobs.len());

    for job in jobs {
        validate_name(&job.name)?;
        if !seen.insert(job.name.as_str()) {
            return Err(DeployError::Template(format!(
                "duplicate job name: {}",
                job.name
            )));
        }
        validate_schedule(&job.name, &job.schedule)?;

        let command = interpolate(&job.command, vars)?;
        if command.trim().is_empty() || command.contains('\n') {
            return Err(DeployError::Template(format!(
                "job {} needs a single-line, non-empty command",
                job.name
            )));
        }

        rendered.push(RenderedJob {
            name: job.name.clone(),
            command,
            image: job.image.clone().unwrap_or_else(|| default_image.to_string()),
            schedule: job.schedule.split_whitespace().collect::<Vec<_>>().join(" "),
        });
    }

    Ok(rendered)
}

/// Serialize rendered jobs to the job runner's YAML format.
pub fn to_yaml(jobs: &[RenderedJob]) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(HEADER);
    out.push('\n');

    for (i, job) in jobs.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let stem = job.log_stem();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "- name: {}", yaml_scalar(&job.name));
        let _ = writeln!(out, "  command: {}", yaml_scalar(&job.command));
        let _ = writeln!(out, "  image: {}", yaml_scalar(&job.image));
        let _ = writeln!(out, "  filelog-stdout: logs/{}.stdout.log", stem);
        let _ = writeln!(out, "  filelog-stderr: logs/{}.stderr.log", stem);
        let _ = writeln!(out, "  schedule: {}", single_quoted(&job.schedule));
        out.push_str("  emails: none\n");
    }

    out
}

fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-');
    if !valid {
        return Err(DeployError::Template(format!(
            "job name must be lowercase letters, digits and inner dashes: {:?}",
            name
        )));
    }
    Ok(())
}

fn validate_schedule(name: &str, schedule: &str) -> Result<()> {
    let fields = schedule.split_whitespace().count();
    if fields != 5 {
        return Err(DeployError::Template(format!(
            "job {} schedule must have 5 fields, got {}: {:?}",
            name, fields, schedule
        )));
    }
    Ok(())
}

/// Emit `value` as a plain scalar when YAML would read it back unchanged.
fn yaml_scalar(value: &str) -> String {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
        '`',
    ];
    const RESERVED: &[&str] = &["true", "false", "yes", "no", "on", "off", "null", "~"];

    let needs_quotes = value.is_empty()
        || value.starts_with(INDICATORS)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.ends_with(':')
        || value.contains(": ")
        || value.contains(" #")
        || RESERVED.contains(&value.to_ascii_lowercase().as_str())
        || value.parse::<f64>().is_ok();

    if needs_quotes {
        single_quoted(value)
    } else {
        value.to_string()
    }
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

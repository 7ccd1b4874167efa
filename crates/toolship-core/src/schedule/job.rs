//! Scheduled job definitions.

use serde::{Deserialize, Serialize};

/// One job as written in config. `command` is a template, see
/// [`crate::schedule::template`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    pub name: String,
    pub command: String,
    /// Five-field cron expression
    pub schedule: String,
    /// Overrides `schedule.image` for this job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl JobSpec {
    pub fn new(name: &str, schedule: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            command: command.to_string(),
            schedule: schedule.to_string(),
            image: None,
        }
    }
}

/// Backups, backup pruning, and the periodic API pings of the review tool.
pub fn default_jobs() -> Vec<JobSpec> {
    vec![
        JobSpec::new(
            "backup-database",
            "45 */2 * * *",
            r#"mysqldump --defaults-file={db_config} -h tools-db -r {backup_dir}/$(date +"%d-%m-%Y_%H-%M-%S")-review.sql s54862__review"#,
        ),
        JobSpec::new(
            "prune-backups",
            "30 5 * * *",
            "find {backup_dir} -mtime +7 -delete",
        ),
        JobSpec::new(
            "update-stats",
            "13 9 * * *",
            "curl -s https://cluebotng-review.toolforge.org/api/cron/stats",
        ),
        JobSpec::new(
            "report-import",
            "13 * * * *",
            "curl -s https://cluebotng-review.toolforge.org/api/report/import",
        ),
        JobSpec::new(
            "review-import",
            "48 * * * *",
            "curl -s https://cluebotng.toolforge.org/api/?action=review.import",
        ),
        JobSpec::new(
            "training-import",
            "30 * * * *",
            "curl -s https://cluebotng-review.toolforge.org/api/training/import",
        ),
    ]
}

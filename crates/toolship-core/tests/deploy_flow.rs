//! Tests for the deploy and restart flows against a fake host.

mod support;

use support::FakeHost;
use toolship_core::config::ToolshipConfig;
use toolship_core::deploy::{Deployer, InstallOutcome};
use toolship_core::release::{FixedRelease, ReleaseSource, ReleaseTag};
use toolship_core::schedule::JobSpec;
use toolship_core::{DeployError, Result};

const ARTIFACT: &str = "/data/project/cluebotng-review/releases/v1.2.3";
const SYMLINK: &str = "/data/project/cluebotng-review/reviewng";
const JOBS_FILE: &str = "/data/project/cluebotng-review/jobs.yaml";

fn release(tag: &str) -> FixedRelease {
    FixedRelease(ReleaseTag::new(tag).unwrap())
}

struct FailingRelease;

impl ReleaseSource for FailingRelease {
    fn latest_tag(&self) -> Result<ReleaseTag> {
        Err(DeployError::Release {
            url: "https://api.github.com/repos/cluebotng/reviewng/releases/latest".to_string(),
            message: "HTTP 500 Internal Server Error".to_string(),
        })
    }
}

#[test]
fn fresh_release_is_downloaded_made_executable_and_linked() {
    let config = ToolshipConfig::default();
    let deployer = Deployer::new(&config);
    let mut host = FakeHost::new();

    let report = deployer.deploy(&release("v1.2.3"), &mut host).unwrap();

    assert_eq!(report.outcome, InstallOutcome::Installed);
    assert_eq!(report.artifact, ARTIFACT);
    assert_eq!(host.count_containing("wget "), 1);
    assert_eq!(host.count_containing("chmod "), 1);

    let download = host.position_of("wget ").unwrap();
    let chmod = host.position_of("chmod 550 ").unwrap();
    let relink = host.position_of("ln -sfn ").unwrap();
    assert!(download < chmod && chmod < relink);

    assert!(host.scripts()[download].contains(
        "https://github.com/cluebotng/reviewng/releases/download/v1.2.3/reviewng"
    ));
    assert_eq!(host.symlinks.get(SYMLINK).map(String::as_str), Some(ARTIFACT));
}

#[test]
fn present_release_skips_download_but_keeps_mode() {
    let config = ToolshipConfig::default();
    let deployer = Deployer::new(&config);
    let mut host = FakeHost::new().with_file(ARTIFACT);

    let report = deployer.deploy(&release("v1.2.3"), &mut host).unwrap();

    assert_eq!(report.outcome, InstallOutcome::AlreadyPresent);
    assert!(!report.restarted);
    assert_eq!(host.count_containing("wget "), 0);
    assert_eq!(host.count_containing(&format!("chmod 550 {ARTIFACT}")), 1);
    assert_eq!(host.count_containing("ln -sfn "), 1);
    assert!(host.position_of("chmod ").unwrap() < host.position_of("ln -sfn ").unwrap());
}

#[test]
fn relink_always_targets_the_same_symlink() {
    let config = ToolshipConfig::default();
    let deployer = Deployer::new(&config);
    let mut host = FakeHost::new();

    deployer.deploy(&release("v1.0.0"), &mut host).unwrap();
    deployer.deploy(&release("v1.0.0"), &mut host).unwrap();
    deployer.deploy(&release("v1.1.0"), &mut host).unwrap();

    let links: Vec<&str> = host
        .scripts()
        .into_iter()
        .filter(|s| s.starts_with("ln -sfn "))
        .collect();
    assert_eq!(links.len(), 3);
    for link in links {
        assert!(link.ends_with(&format!("mv -Tf {SYMLINK}.new {SYMLINK}")), "{link}");
    }
    assert_eq!(
        host.symlinks.get(SYMLINK).map(String::as_str),
        Some("/data/project/cluebotng-review/releases/v1.1.0")
    );
}

#[test]
fn restart_happens_only_when_release_is_new() {
    let config = ToolshipConfig::default();
    let deployer = Deployer::new(&config);
    let mut host = FakeHost::new();

    let first = deployer.deploy(&release("v1.2.3"), &mut host).unwrap();
    assert!(first.restarted);
    assert_eq!(host.count_containing("wget "), 1);
    assert_eq!(host.count_containing(" stop "), 1);
    assert_eq!(host.count_containing(" start "), 1);

    let stop = host.position_of(" stop ").unwrap();
    let start = host.position_of(" start ").unwrap();
    assert!(host.position_of("ln -sfn ").unwrap() < stop);
    assert!(stop < start);
    assert!(start < host.position_of("toolforge jobs load").unwrap());

    host.clear_log();
    let second = deployer.deploy(&release("v1.2.3"), &mut host).unwrap();
    assert!(!second.restarted);
    assert_eq!(host.count_containing("wget "), 0);
    assert_eq!(host.count_containing("webservice "), 0);
}

#[test]
fn schedule_is_rewritten_on_every_deploy() {
    let config = ToolshipConfig::default();
    let deployer = Deployer::new(&config);
    let mut host = FakeHost::new().with_file(ARTIFACT);

    for _ in 0..2 {
        host.clear_log();
        let report = deployer.deploy(&release("v1.2.3"), &mut host).unwrap();
        assert_eq!(report.jobs_file, JOBS_FILE);
        assert_eq!(report.job_count, 6);
        assert_eq!(host.count_containing("crontab -r || true"), 1);
        assert_eq!(host.count_containing(&format!("cat > {JOBS_FILE}")), 1);
        assert_eq!(
            host.count_containing(&format!(
                "XDG_CONFIG_HOME=/data/project/cluebotng-review toolforge jobs load {JOBS_FILE}"
            )),
            1
        );
    }
}

#[test]
fn schedule_rewrite_replaces_previous_content() {
    let mut config = ToolshipConfig::default();
    config.schedule.jobs = vec![JobSpec::new(
        "legacy-job",
        "0 0 * * *",
        "curl -s https://example.org/legacy",
    )];
    let mut host = FakeHost::new().with_file(ARTIFACT);
    Deployer::new(&config)
        .deploy(&release("v1.2.3"), &mut host)
        .unwrap();
    assert!(host.contents[JOBS_FILE].contains("legacy-job"));

    let current = ToolshipConfig::default();
    let deployer = Deployer::new(&current);
    deployer.deploy(&release("v1.2.3"), &mut host).unwrap();

    let written = &host.contents[JOBS_FILE];
    assert_eq!(written, &deployer.render_schedule().unwrap());
    assert!(!written.contains("legacy-job"));
    assert!(written.contains("- name: backup-database"));
}

#[test]
fn release_failure_sends_no_remote_commands() {
    let config = ToolshipConfig::default();
    let mut host = FakeHost::new();

    let err = Deployer::new(&config)
        .deploy(&FailingRelease, &mut host)
        .unwrap_err();

    assert!(matches!(err, DeployError::Release { .. }));
    assert!(host.commands.is_empty());
}

#[test]
fn template_error_sends_no_remote_commands() {
    let mut config = ToolshipConfig::default();
    config.schedule.jobs = vec![JobSpec::new("broken", "* * * * *", "ls {nowhere}")];
    let mut host = FakeHost::new();

    let err = Deployer::new(&config)
        .deploy(&release("v1.2.3"), &mut host)
        .unwrap_err();

    assert!(matches!(err, DeployError::Template(_)));
    assert!(host.commands.is_empty());
}

#[test]
fn remote_failure_aborts_remaining_steps() {
    let config = ToolshipConfig::default();
    let mut host = FakeHost::new().failing_on("chmod ");

    let err = Deployer::new(&config)
        .deploy(&release("v1.2.3"), &mut host)
        .unwrap_err();

    match err {
        DeployError::RemoteCommand { command, stderr, .. } => {
            assert_eq!(command, format!("chmod 550 {ARTIFACT}"));
            assert!(stderr.contains("simulated failure"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(host.count_containing("ln -sfn "), 0);
    assert_eq!(host.count_containing("webservice "), 0);
    assert_eq!(host.count_containing("crontab"), 0);
}

#[test]
fn rerun_after_failed_chmod_sets_mode_again() {
    let config = ToolshipConfig::default();
    let deployer = Deployer::new(&config);
    let mut host = FakeHost::new().failing_on("chmod ");

    deployer.deploy(&release("v1.2.3"), &mut host).unwrap_err();
    assert!(host.files.contains(ARTIFACT));

    host.recover();
    host.clear_log();
    let report = deployer.deploy(&release("v1.2.3"), &mut host).unwrap();

    assert_eq!(report.outcome, InstallOutcome::AlreadyPresent);
    assert!(!report.restarted);
    assert_eq!(host.count_containing("wget "), 0);
    assert_eq!(host.count_containing(&format!("chmod 550 {ARTIFACT}")), 1);
    assert_eq!(host.symlinks.get(SYMLINK).map(String::as_str), Some(ARTIFACT));
}

#[test]
fn failed_stop_aborts_before_start() {
    let config = ToolshipConfig::default();
    let mut host = FakeHost::new().failing_on(" stop ");

    let err = Deployer::new(&config).restart(&mut host).unwrap_err();

    assert!(matches!(err, DeployError::RemoteCommand { .. }));
    assert_eq!(host.count_containing(" start "), 0);
}

#[test]
fn restart_issues_stop_then_start() {
    let config = ToolshipConfig::default();
    let mut host = FakeHost::new();

    Deployer::new(&config).restart(&mut host).unwrap();

    assert_eq!(
        host.scripts(),
        [
            format!("webservice --backend=kubernetes golang1.11 stop {SYMLINK}"),
            format!("webservice --backend=kubernetes golang1.11 start {SYMLINK}"),
        ]
    );
}

#[test]
fn probe_exit_one_means_absent() {
    let config = ToolshipConfig::default();
    let mut host = FakeHost::new().failing_on("test -f ");

    Deployer::new(&config)
        .deploy(&release("v1.2.3"), &mut host)
        .unwrap();
    assert_eq!(host.count_containing("wget "), 1);
}

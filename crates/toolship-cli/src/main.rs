//! Toolship - release deployer for tool accounts
//!
//! Usage:
//!   toolship deploy      # Install the latest release, restart, rewrite jobs
//!   toolship restart     # Restart the web service only
//!   toolship release     # Show the latest release
//!   toolship jobs        # Print the job file a deploy would write

mod confirm;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toolship_core::config::{ConfigSource, ConfigStore, ToolshipConfig};
use toolship_core::deploy::{DeployReport, Deployer, InstallOutcome};
use toolship_core::release::{FixedRelease, GitHubReleases, ReleaseSource, ReleaseTag};
use toolship_core::remote::{DryRunSession, RemoteSession, SshSession};

use crate::confirm::{Action, ConfirmFlow};

#[derive(Parser)]
#[command(name = "toolship")]
#[command(about = "Deploy releases to a tool account over SSH", long_about = None)]
struct Cli {
    /// Config file (default: ./toolship.toml, then the user config directory)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log every remote command
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the latest release, restart if it is new, rewrite the job schedule
    Deploy {
        /// Deploy this tag instead of looking up the latest release
        #[arg(long)]
        tag: Option<String>,

        /// Print remote commands instead of running them
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Restart the web service
    Restart {
        /// Print remote commands instead of running them
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the latest release and its download URL
    Release {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the job file a deploy would write
    Jobs,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "toolship=debug,toolship_core=debug,info"
    } else {
        "toolship=info,toolship_core=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Deploy {
            tag,
            dry_run,
            yes,
            format,
        } => run_deploy(&config, tag, dry_run, yes, format),
        Commands::Restart { dry_run, yes } => run_restart(&config, dry_run, yes),
        Commands::Release { format } => run_release(&config, format),
        Commands::Jobs => run_jobs(&config),
    }
}

fn load_config(explicit: Option<PathBuf>) -> Result<ToolshipConfig> {
    let store = ConfigStore::from_env(explicit)?;
    let (config, source) = store.load()?;
    match source {
        ConfigSource::File(path) => tracing::info!("Using config {}", path.display()),
        ConfigSource::Defaults => tracing::info!("No toolship.toml found, using built-in defaults"),
    }
    Ok(config)
}

fn open_session(config: &ToolshipConfig, dry_run: bool) -> Box<dyn RemoteSession> {
    if dry_run {
        tracing::warn!("Dry run: no commands will be sent to {}", config.remote.host);
        Box::new(DryRunSession::new(&config.remote.host))
    } else {
        Box::new(SshSession::new(config.remote.clone()))
    }
}

fn run_deploy(
    config: &ToolshipConfig,
    tag: Option<String>,
    dry_run: bool,
    yes: bool,
    format: OutputFormat,
) -> Result<()> {
    // Resolve up front so the prompt can name the release; the deployer then
    // reuses it instead of asking the API twice.
    let tag = match tag {
        Some(tag) => ReleaseTag::new(tag)?,
        None => GitHubReleases::from_config(&config.release).latest_tag()?,
    };

    if !dry_run && !ConfirmFlow::stdout(yes).confirm(config, &Action::Deploy { tag: &tag })? {
        println!("Aborted");
        return Ok(());
    }

    let mut session = open_session(config, dry_run);
    let report = Deployer::new(config).deploy(&FixedRelease(tag), session.as_mut())?;

    print_deploy_report(&report, dry_run, format)
}

fn run_restart(config: &ToolshipConfig, dry_run: bool, yes: bool) -> Result<()> {
    if !dry_run && !ConfirmFlow::stdout(yes).confirm(config, &Action::Restart)? {
        println!("Aborted");
        return Ok(());
    }

    let mut session = open_session(config, dry_run);
    Deployer::new(config).restart(session.as_mut())?;

    println!("✓ Restarted webservice on {}", config.remote.host);
    Ok(())
}

fn run_release(config: &ToolshipConfig, format: OutputFormat) -> Result<()> {
    let tag = GitHubReleases::from_config(&config.release).latest_tag()?;
    let url = Deployer::new(config).artifact_url(&tag)?;

    match format {
        OutputFormat::Table => {
            println!(
                "{}/{} latest release: {}",
                config.release.org, config.release.repo, tag
            );
            println!("  Download: {}", url);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "org": config.release.org,
                "repo": config.release.repo,
                "tag": tag,
                "url": url,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn run_jobs(config: &ToolshipConfig) -> Result<()> {
    print!("{}", Deployer::new(config).render_schedule()?);
    Ok(())
}

fn print_deploy_report(report: &DeployReport, dry_run: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let prefix = if dry_run { "[dry-run] " } else { "" };
            println!("✓ {}Deployed {} to {}", prefix, report.tag, report.host);
            match report.outcome {
                InstallOutcome::Installed => println!("  Installed {}", report.artifact),
                InstallOutcome::AlreadyPresent => {
                    println!("  • {} was already installed", report.artifact)
                }
            }
            if report.restarted {
                println!("  Restarted webservice");
            } else {
                println!("  • Webservice left running");
            }
            println!("  Wrote {} jobs to {}", report.job_count, report.jobs_file);
            let elapsed = report.finished_at - report.started_at;
            println!("  Took {:.1}s", elapsed.num_milliseconds() as f64 / 1000.0);
        }
        OutputFormat::Json => {
            let mut output = serde_json::to_value(report)?;
            output["dry_run"] = serde_json::Value::Bool(dry_run);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

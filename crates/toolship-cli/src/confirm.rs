//! Summary and confirmation shown before touching the remote host.
//!
//! Uses dialoguer for the prompt; `--yes` skips it.

use std::io::Write;

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};

use toolship_core::config::ToolshipConfig;
use toolship_core::layout::RemoteLayout;
use toolship_core::release::ReleaseTag;

/// What the user is about to run.
#[derive(Debug, Clone)]
pub enum Action<'a> {
    Deploy { tag: &'a ReleaseTag },
    Restart,
}

pub struct ConfirmFlow<W: Write> {
    writer: W,
    yes: bool,
    theme: ColorfulTheme,
}

impl ConfirmFlow<std::io::Stdout> {
    pub fn stdout(yes: bool) -> Self {
        Self::with_writer(std::io::stdout(), yes)
    }
}

impl<W: Write> ConfirmFlow<W> {
    pub fn with_writer(writer: W, yes: bool) -> Self {
        Self {
            writer,
            yes,
            theme: ColorfulTheme::default(),
        }
    }

    /// Print the summary and ask to proceed.
    pub fn confirm(&mut self, config: &ToolshipConfig, action: &Action<'_>) -> Result<bool> {
        self.write_summary(config, action)?;

        if self.yes {
            return Ok(true);
        }

        let prompt = match action {
            Action::Deploy { .. } => "Proceed with deploy?",
            Action::Restart => "Proceed with restart?",
        };
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        Ok(confirmed)
    }

    fn write_summary(&mut self, config: &ToolshipConfig, action: &Action<'_>) -> Result<()> {
        let layout = RemoteLayout::from_config(config);

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Summary").bold())?;
        writeln!(self.writer, "  ───────────────────────────")?;

        let verb = match action {
            Action::Deploy { .. } => "Deploy",
            Action::Restart => "Restart",
        };
        writeln!(self.writer, "  Action:   {}", style(verb).green())?;
        writeln!(self.writer, "  Host:     {}", style(&config.remote.host).green())?;
        writeln!(self.writer, "  Account:  {}", style(&config.remote.user).green())?;

        if let Action::Deploy { tag } = action {
            writeln!(self.writer, "  Release:  {}", style(tag).green())?;
            writeln!(
                self.writer,
                "  Artifact: {}",
                style(layout.artifact(tag)).green()
            )?;
        }
        writeln!(self.writer, "  Symlink:  {}", style(layout.symlink()).green())?;
        writeln!(self.writer)?;

        Ok(())
    }
}

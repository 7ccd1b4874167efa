//! TOML parser with helpful error messages

use super::schema::ToolshipConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse toolship.toml with detailed error messages
pub fn parse_toolship_toml(path: &Path) -> Result<ToolshipConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toolship_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse toolship.toml content from string
pub fn parse_toolship_toml_str(content: &str) -> Result<ToolshipConfig> {
    let config: ToolshipConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate()?;

    Ok(config)
}

/// Enhance TOML parsing errors with the offending lines
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();

    let line_num = error
        .span()
        .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);

    match line_num {
        Some(line_num) => {
            let context = get_line_context(content, line_num);
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                context,
                message
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let end = (line_num + 2).min(lines.len());
    let start = line_num.saturating_sub(2).min(end);

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_toolship_toml_str("").unwrap();
        assert_eq!(config, ToolshipConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_toolship_toml_str(
            r#"
[remote]
host = "bastion.example.org"

[tool]
base_dir = "/srv/tool"
link_name = "current"
"#,
        )
        .unwrap();

        assert_eq!(config.remote.host, "bastion.example.org");
        assert_eq!(config.remote.user, "tools.cluebotng-review");
        assert_eq!(config.tool.base_dir, "/srv/tool");
        assert_eq!(config.link_name(), "current");
        assert_eq!(config.release.repo, "reviewng");
    }

    #[test]
    fn parses_custom_jobs() {
        let config = parse_toolship_toml_str(
            r#"
[[schedule.job]]
name = "ping"
command = "curl -s https://example.org/ping"
schedule = "*/5 * * * *"
"#,
        )
        .unwrap();

        assert_eq!(config.schedule.jobs.len(), 1);
        assert_eq!(config.schedule.effective_jobs()[0].name, "ping");
    }

    #[test]
    fn syntax_error_points_at_line() {
        let err = parse_toolship_toml_str("[remote]\nhost = \"a\"\nuser = \n").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("line 3"), "{}", message);
        assert!(message.contains(">>>"), "{}", message);
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(parse_toolship_toml_str("[remote]\nhostname = \"a\"\n").is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = parse_toolship_toml_str("[tool]\nbase_dir = \"relative\"\n").unwrap_err();
        assert!(err.to_string().contains("tool.base_dir"));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = ToolshipConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert_eq!(parse_toolship_toml_str(&rendered).unwrap(), config);
    }
}

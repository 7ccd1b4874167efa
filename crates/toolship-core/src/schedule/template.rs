//! `{placeholder}` interpolation for job commands.
//!
//! Recognised placeholders are `{tool_dir}`, `{backup_dir}`, `{db_config}`
//! and `{symlink}`. Literal braces are written `{{` and `}}`.

use crate::error::{DeployError, Result};
use crate::layout::RemoteLayout;

/// Values substituted into job commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars {
    pub tool_dir: String,
    pub backup_dir: String,
    pub db_config: String,
    pub symlink: String,
}

impl TemplateVars {
    pub fn from_layout(layout: &RemoteLayout) -> Self {
        Self {
            tool_dir: layout.base_dir().to_string(),
            backup_dir: layout.backup_dir(),
            db_config: layout.db_config(),
            symlink: layout.symlink(),
        }
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "tool_dir" => Some(&self.tool_dir),
            "backup_dir" => Some(&self.backup_dir),
            "db_config" => Some(&self.db_config),
            "symlink" => Some(&self.symlink),
            _ => None,
        }
    }
}

/// Substitute placeholders in `template`.
pub fn interpolate(template: &str, vars: &TemplateVars) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(DeployError::Template(format!(
                                "unterminated placeholder in {:?}",
                                template
                            )));
                        }
                    }
                }
                let value = vars.lookup(name.trim()).ok_or_else(|| {
                    DeployError::Template(format!(
                        "unknown placeholder {{{}}} in {:?}",
                        name, template
                    ))
                })?;
                out.push_str(value);
            }
            '}' => {
                return Err(DeployError::Template(format!(
                    "unmatched '}}' in {:?}",
                    template
                )));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

//! Release tag newtype.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeployError, Result};

/// A release tag, safe to use as a single path component and shell word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseTag(String);

impl ReleaseTag {
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        let valid_chars = tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+'));
        let bad_start = tag.starts_with('.') || tag.starts_with('-');
        if tag.is_empty() || !valid_chars || bad_start {
            return Err(DeployError::InvalidTag(tag));
        }
        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ReleaseTag {
    type Error = DeployError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ReleaseTag> for String {
    fn from(tag: ReleaseTag) -> Self {
        tag.0
    }
}

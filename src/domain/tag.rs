//! Tag identifier for the upstream repository.

use crate::error::AppError;
use regex::Regex;
use std::sync::OnceLock;

/// A tag or branch name of the upstream repository.
///
/// The tag doubles as a staging directory name and as part of the marker file
/// name, so it must be a single, harmless path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._+-]*$").unwrap())
}

impl Tag {
    /// Parse and validate a tag
    pub fn parse(s: &str) -> Result<Self, AppError> {
        if tag_pattern().is_match(s) && !s.contains("..") {
            Ok(Self(s.to_string()))
        } else {
            Err(AppError::InvalidTag(s.to_string()))
        }
    }

    /// Get the tag as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Tag {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

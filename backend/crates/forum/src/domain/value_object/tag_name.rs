//! Tag Name Value Object

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a tag name (in characters)
pub const TAG_NAME_MAX_LENGTH: usize = 50;

/// Trimmed, lowercased tag name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagName(String);

impl TagName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let name = raw.as_ref().trim().to_lowercase();

        if name.is_empty() {
            return Err(AppError::bad_request("Tag name cannot be empty"));
        }
        if name.chars().count() > TAG_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Tag name must be at most {} characters",
                TAG_NAME_MAX_LENGTH
            )));
        }

        Ok(Self(name))
    }

    /// Normalize a list of names, dropping blanks and duplicates
    pub fn parse_list<I, S>(raw: I) -> AppResult<Vec<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<Self> = Vec::new();
        for item in raw {
            if item.as_ref().trim().is_empty() {
                continue;
            }
            let name = Self::new(item)?;
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized() {
        assert_eq!(TagName::new("  Rust ").unwrap().as_str(), "rust");
    }

    #[test]
    fn test_parse_list_dedups() {
        let names = TagName::parse_list(["Rust", "rust ", "", "  ", "Async"]).unwrap();
        let names: Vec<&str> = names.iter().map(TagName::as_str).collect();
        assert_eq!(names, vec!["rust", "async"]);
    }
}

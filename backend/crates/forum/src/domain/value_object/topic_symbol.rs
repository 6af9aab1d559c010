//! Topic Symbol Value Object
//!
//! Short board code such as `GEN` or `RS`, stored uppercase.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a topic symbol (in characters)
pub const TOPIC_SYMBOL_MAX_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicSymbol(String);

impl TopicSymbol {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let symbol = raw.as_ref().trim().to_uppercase();

        if symbol.is_empty() {
            return Err(AppError::bad_request("Topic symbol cannot be empty"));
        }
        if symbol.chars().count() > TOPIC_SYMBOL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Topic symbol must be at most {} characters",
                TOPIC_SYMBOL_MAX_LENGTH
            ))
            .with_action("Use a code like GEN or RS"));
        }
        if symbol.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AppError::bad_request(
                "Topic symbol cannot contain whitespace",
            ));
        }

        Ok(Self(symbol))
    }

    pub fn from_db(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercased() {
        assert_eq!(TopicSymbol::new(" gen ").unwrap().as_str(), "GEN");
        assert_eq!(TopicSymbol::new("r").unwrap().as_str(), "R");
    }

    #[test]
    fn test_rejected() {
        assert!(TopicSymbol::new("").is_err());
        assert!(TopicSymbol::new("LONG").is_err());
        assert!(TopicSymbol::new("a b").is_err());
    }

    #[test]
    fn test_length_counted_after_uppercasing() {
        // "ß" uppercases to "SS"
        assert!(TopicSymbol::new("ßßß").is_err());
        assert_eq!(TopicSymbol::new("ß").unwrap().as_str(), "SS");
    }
}

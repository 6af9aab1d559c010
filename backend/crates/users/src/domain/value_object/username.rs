//! Username Value Object
//!
//! The public handle used to log in and to show authorship.
//!
//! Input is NFKC-normalized and trimmed before validation. Case is kept
//! as entered; uniqueness is exact.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for a username (in characters)
pub const USERNAME_MAX_LENGTH: usize = 255;

/// Username value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new username with validation
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let username = normalized.trim();

        if username.is_empty() {
            return Err(AppError::bad_request("Username cannot be empty"));
        }

        let len = username.chars().count();
        if len > USERNAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Username must be at most {} characters (got {})",
                USERNAME_MAX_LENGTH, len
            )));
        }

        if username
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(AppError::bad_request(
                "Username cannot contain whitespace or control characters",
            ));
        }

        Ok(Self(username.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

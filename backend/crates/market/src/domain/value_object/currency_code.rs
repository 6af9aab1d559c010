//! Currency Code Value Object
//!
//! ISO 4217 style: exactly three ASCII uppercase letters.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Input is trimmed and uppercased first, so `usd` is accepted
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let code = raw.as_ref().trim().to_ascii_uppercase();

        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(AppError::bad_request(format!(
                "Currency code must be three letters (got `{}`)",
                raw.as_ref()
            ))
            .with_action("Use an ISO 4217 code such as USD"));
        }

        Ok(Self(code))
    }

    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

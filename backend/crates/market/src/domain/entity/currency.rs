//! Currency Entity

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::CurrencyId;

use crate::domain::value_object::currency_code::CurrencyCode;

/// Maximum length for a currency symbol (in characters)
pub const CURRENCY_SYMBOL_MAX_LENGTH: usize = 3;

#[derive(Debug, Clone)]
pub struct Currency {
    pub currency_id: CurrencyId,
    /// Unique
    pub code: CurrencyCode,
    /// Display symbol such as `$`
    pub symbol: String,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Currency {
    pub fn new(code: CurrencyCode, symbol: impl Into<String>) -> AppResult<Self> {
        let symbol = symbol.into().trim().to_string();
        if symbol.is_empty() || symbol.chars().count() > CURRENCY_SYMBOL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Currency symbol must be 1 to {} characters",
                CURRENCY_SYMBOL_MAX_LENGTH
            )));
        }

        let now = Utc::now();
        Ok(Self {
            currency_id: CurrencyId::new(),
            code,
            symbol,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }
}

//! Shop Entity
//!
//! A seller runs at most one shop.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{ShopId, UserId};

/// Maximum length for a shop name (in characters)
pub const SHOP_NAME_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone)]
pub struct Shop {
    pub shop_id: ShopId,
    pub seller_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    pub fn new(seller_id: UserId, name: &str, description: Option<String>) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Shop name cannot be empty"));
        }
        if name.chars().count() > SHOP_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Shop name must be at most {} characters",
                SHOP_NAME_MAX_LENGTH
            )));
        }

        let now = Utc::now();
        Ok(Self {
            shop_id: ShopId::new(),
            seller_id,
            name: name.to_string(),
            description,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_run_by(&self, user_id: &UserId) -> bool {
        self.seller_id == *user_id
    }
}

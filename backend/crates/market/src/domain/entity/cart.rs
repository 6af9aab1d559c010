//! Product Cart Entity
//!
//! One row per product placed in a user's cart.

use chrono::{DateTime, Utc};
use kernel::id::{ProductCartId, ProductId, UserId};

#[derive(Debug, Clone)]
pub struct ProductCart {
    pub cart_id: ProductCartId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductCart {
    pub fn new(user_id: UserId, product_id: ProductId) -> Self {
        let now = Utc::now();
        Self {
            cart_id: ProductCartId::new(),
            user_id,
            product_id,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

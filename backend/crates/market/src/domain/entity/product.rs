//! Product Entity

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{CurrencyId, ProductId, ShopId};

use crate::domain::value_object::price::Price;

/// Maximum length for a product name (in characters)
pub const PRODUCT_NAME_MAX_LENGTH: usize = 255;

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Product name cannot be empty"));
    }
    if name.chars().count() > PRODUCT_NAME_MAX_LENGTH {
        return Err(AppError::bad_request(format!(
            "Product name must be at most {} characters",
            PRODUCT_NAME_MAX_LENGTH
        )));
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone)]
pub struct Product {
    pub product_id: ProductId,
    pub shop_id: ShopId,
    pub name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub price: Price,
    pub currency_id: CurrencyId,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        shop_id: ShopId,
        name: &str,
        price: Price,
        currency_id: CurrencyId,
        image_url: Option<String>,
        description: Option<String>,
    ) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            product_id: ProductId::new(),
            shop_id,
            name: validate_name(name)?,
            image_url,
            description,
            price,
            currency_id,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn rename(&mut self, name: &str) -> AppResult<()> {
        self.name = validate_name(name)?;
        self.touch();
        Ok(())
    }

    pub fn set_price(&mut self, price: Price, currency_id: CurrencyId) {
        self.price = price;
        self.currency_id = currency_id;
        self.touch();
    }

    pub fn set_image_url(&mut self, image_url: Option<String>) {
        self.image_url = image_url;
        self.touch();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl crate::domain::payment::Priceable for Product {
    fn description(&self) -> String {
        self.name.clone()
    }

    fn price(&self) -> Option<rust_decimal::Decimal> {
        Some(self.price.amount())
    }
}

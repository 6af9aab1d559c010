//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{CurrencyId, ProductCartId, ProductId, ShopId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::CartSummary;
use crate::domain::entity::{
    cart::ProductCart, currency::Currency, product::Product, shop::Shop,
};
use crate::domain::payment::LineItemList;

// ============================================================================
// Requests
// ============================================================================

/// Open shop request; a seller id in the body is ignored
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenShopRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    /// Accepts `"10.50"` or `10.5`
    pub price: Decimal,
    /// Currency code such as `RUB`
    pub currency: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Update product request; omitted fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub expected_version: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CurrencyResponse {
    pub id: CurrencyId,
    pub code: String,
    pub symbol: String,
}

impl From<Currency> for CurrencyResponse {
    fn from(currency: Currency) -> Self {
        Self {
            id: currency.currency_id,
            code: currency.code.as_str().to_string(),
            symbol: currency.symbol,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopResponse {
    pub id: ShopId,
    pub seller_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Shop> for ShopResponse {
    fn from(shop: Shop) -> Self {
        Self {
            id: shop.shop_id,
            seller_id: shop.seller_id,
            name: shop.name,
            description: shop.description,
            version: shop.version,
            created_at: shop.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub shop_id: ShopId,
    pub name: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency_id: CurrencyId,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.product_id,
            shop_id: product.shop_id,
            name: product.name,
            image_url: product.image_url,
            description: product.description,
            price: product.price.amount(),
            currency_id: product.currency_id,
            version: product.version,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: ProductCartId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
}

impl From<ProductCart> for CartItemResponse {
    fn from(item: ProductCart) -> Self {
        Self {
            id: item.cart_id,
            product_id: item.product_id,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartSummaryResponse {
    pub items: LineItemList,
    pub total: Decimal,
    pub currency: Option<String>,
}

impl From<CartSummary> for CartSummaryResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            items: summary.items,
            total: summary.total,
            currency: summary.currency.map(|c| c.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_accepts_string_or_number() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name": "Tea", "price": "10.50", "currency": "rub"}"#)
                .unwrap();
        assert_eq!(req.price, Decimal::new(1050, 2));

        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name": "Tea", "price": 4, "currency": "RUB"}"#).unwrap();
        assert_eq!(req.price, Decimal::new(4, 0));
        assert!(req.image_url.is_none());
    }

    #[test]
    fn test_open_shop_ignores_seller_field() {
        let json = format!(r#"{{"name": "Corner", "sellerId": "{}"}}"#, UserId::new());
        let req: OpenShopRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.name, "Corner");
    }
}

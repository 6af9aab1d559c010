//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer and report constraint violations by name.

use kernel::error::store::StoreResult;
use kernel::id::{CurrencyId, ProductCartId, ProductId, ShopId, UserId};
use kernel::page::Page;

use crate::domain::entity::{
    cart::ProductCart, currency::Currency, product::Product, shop::Shop,
};
use crate::domain::value_object::currency_code::CurrencyCode;

/// Constraint names shared by the schema and the services
pub mod constraint {
    pub const CURRENCIES_CODE_KEY: &str = "currencies_code_key";
    pub const PRODUCTS_PRICE_CHECK: &str = "products_price_check";
}

/// Currency repository trait
#[trait_variant::make(CurrencyRepository: Send)]
pub trait LocalCurrencyRepository {
    async fn add(&self, currency: &Currency) -> StoreResult<()>;

    async fn update(&self, currency: &mut Currency) -> StoreResult<()>;

    async fn get(&self, currency_id: &CurrencyId) -> StoreResult<Option<Currency>>;

    async fn get_by_code(&self, code: &CurrencyCode) -> StoreResult<Option<Currency>>;

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Currency>>;

    async fn delete(&self, currency_id: &CurrencyId) -> StoreResult<bool>;
}

/// Shop repository trait
#[trait_variant::make(ShopRepository: Send)]
pub trait LocalShopRepository {
    async fn add(&self, shop: &Shop) -> StoreResult<()>;

    async fn update(&self, shop: &mut Shop) -> StoreResult<()>;

    async fn get(&self, shop_id: &ShopId) -> StoreResult<Option<Shop>>;

    /// The seller's oldest shop
    async fn get_by_seller(&self, seller_id: &UserId) -> StoreResult<Option<Shop>>;

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Shop>>;

    async fn delete(&self, shop_id: &ShopId) -> StoreResult<bool>;
}

/// Product repository trait
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    async fn add(&self, product: &Product) -> StoreResult<()>;

    async fn update(&self, product: &mut Product) -> StoreResult<()>;

    async fn get(&self, product_id: &ProductId) -> StoreResult<Option<Product>>;

    async fn get_by_shop(&self, shop_id: &ShopId, page: Page) -> StoreResult<Vec<Product>>;

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Product>>;

    async fn delete(&self, product_id: &ProductId) -> StoreResult<bool>;
}

/// Cart repository trait
#[trait_variant::make(CartRepository: Send)]
pub trait LocalCartRepository {
    async fn add(&self, item: &ProductCart) -> StoreResult<()>;

    async fn get(&self, cart_id: &ProductCartId) -> StoreResult<Option<ProductCart>>;

    async fn get_by_user(&self, user_id: &UserId, page: Page) -> StoreResult<Vec<ProductCart>>;

    /// Every cart row of a user, for pricing
    async fn get_all_by_user(&self, user_id: &UserId) -> StoreResult<Vec<ProductCart>>;

    async fn delete(&self, cart_id: &ProductCartId) -> StoreResult<bool>;
}

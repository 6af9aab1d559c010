//! PostgreSQL Repository Implementations
//!
//! Prices are `NUMERIC` columns read and written through `rust_decimal`.

use chrono::{DateTime, Utc};
use kernel::error::store::{StoreError, StoreResult};
use kernel::id::{CurrencyId, ProductCartId, ProductId, ShopId, UserId};
use kernel::page::Page;
use kernel::session::PgSession;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::entity::{
    cart::ProductCart, currency::Currency, product::Product, shop::Shop,
};
use crate::domain::repository::{
    CartRepository, CurrencyRepository, ProductRepository, ShopRepository,
};
use crate::domain::value_object::{currency_code::CurrencyCode, price::Price};

macro_rules! select_currencies {
    ($tail:literal) => {
        concat!(
            "SELECT currency_id, code, symbol, version, created_at, updated_at FROM currencies ",
            $tail
        )
    };
}

macro_rules! select_shops {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                shop_id,
                seller_id,
                name,
                description,
                version,
                created_at,
                updated_at
            FROM shops
            "#,
            $tail
        )
    };
}

macro_rules! select_products {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                product_id,
                shop_id,
                name,
                image_url,
                description,
                price,
                currency_id,
                version,
                created_at,
                updated_at
            FROM products
            "#,
            $tail
        )
    };
}

macro_rules! select_carts {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                cart_id,
                user_id,
                product_id,
                version,
                created_at,
                updated_at
            FROM product_carts
            "#,
            $tail
        )
    };
}

/// Zero affected rows on a version-guarded write means the row moved on
fn ensure_written(rows_affected: u64) -> StoreResult<()> {
    if rows_affected == 0 {
        Err(StoreError::StaleWrite)
    } else {
        Ok(())
    }
}

/// PostgreSQL-backed market repository
#[derive(Clone)]
pub struct PgMarketRepository {
    session: PgSession,
}

impl PgMarketRepository {
    pub fn new(session: PgSession) -> Self {
        Self { session }
    }
}

// ============================================================================
// Currency Repository Implementation
// ============================================================================

impl CurrencyRepository for PgMarketRepository {
    async fn add(&self, currency: &Currency) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO currencies (currency_id, code, symbol, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(currency.currency_id.as_uuid())
        .bind(currency.code.as_str())
        .bind(&currency.symbol)
        .bind(currency.version)
        .bind(currency.created_at)
        .bind(currency.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn update(&self, currency: &mut Currency) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE currencies SET
                code = $3,
                symbol = $4,
                updated_at = $5,
                version = version + 1
            WHERE currency_id = $1 AND version = $2
            "#,
        )
        .bind(currency.currency_id.as_uuid())
        .bind(currency.version)
        .bind(currency.code.as_str())
        .bind(&currency.symbol)
        .bind(currency.updated_at)
        .execute(session.conn()?)
        .await?;

        ensure_written(result.rows_affected())?;
        currency.version += 1;
        Ok(())
    }

    async fn get(&self, currency_id: &CurrencyId) -> StoreResult<Option<Currency>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, CurrencyRow>(select_currencies!("WHERE currency_id = $1"))
            .bind(currency_id.as_uuid())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(CurrencyRow::into_currency))
    }

    async fn get_by_code(&self, code: &CurrencyCode) -> StoreResult<Option<Currency>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, CurrencyRow>(select_currencies!("WHERE code = $1"))
            .bind(code.as_str())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(CurrencyRow::into_currency))
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Currency>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, CurrencyRow>(select_currencies!(
            "ORDER BY code LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(CurrencyRow::into_currency).collect())
    }

    async fn delete(&self, currency_id: &CurrencyId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM currencies WHERE currency_id = $1")
            .bind(currency_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Shop Repository Implementation
// ============================================================================

impl ShopRepository for PgMarketRepository {
    async fn add(&self, shop: &Shop) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO shops (shop_id, seller_id, name, description, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(shop.shop_id.as_uuid())
        .bind(shop.seller_id.as_uuid())
        .bind(&shop.name)
        .bind(&shop.description)
        .bind(shop.version)
        .bind(shop.created_at)
        .bind(shop.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn update(&self, shop: &mut Shop) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE shops SET
                name = $3,
                description = $4,
                updated_at = $5,
                version = version + 1
            WHERE shop_id = $1 AND version = $2
            "#,
        )
        .bind(shop.shop_id.as_uuid())
        .bind(shop.version)
        .bind(&shop.name)
        .bind(&shop.description)
        .bind(shop.updated_at)
        .execute(session.conn()?)
        .await?;

        ensure_written(result.rows_affected())?;
        shop.version += 1;
        Ok(())
    }

    async fn get(&self, shop_id: &ShopId) -> StoreResult<Option<Shop>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, ShopRow>(select_shops!("WHERE shop_id = $1"))
            .bind(shop_id.as_uuid())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(ShopRow::into_shop))
    }

    async fn get_by_seller(&self, seller_id: &UserId) -> StoreResult<Option<Shop>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, ShopRow>(select_shops!(
            "WHERE seller_id = $1 ORDER BY created_at, shop_id LIMIT 1"
        ))
        .bind(seller_id.as_uuid())
        .fetch_optional(session.conn()?)
        .await?;

        Ok(row.map(ShopRow::into_shop))
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Shop>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, ShopRow>(select_shops!(
            "ORDER BY created_at, shop_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(ShopRow::into_shop).collect())
    }

    async fn delete(&self, shop_id: &ShopId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM shops WHERE shop_id = $1")
            .bind(shop_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Product Repository Implementation
// ============================================================================

impl ProductRepository for PgMarketRepository {
    async fn add(&self, product: &Product) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO products (
                product_id,
                shop_id,
                name,
                image_url,
                description,
                price,
                currency_id,
                version,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(product.shop_id.as_uuid())
        .bind(&product.name)
        .bind(&product.image_url)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(product.currency_id.as_uuid())
        .bind(product.version)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn update(&self, product: &mut Product) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = $3,
                image_url = $4,
                description = $5,
                price = $6,
                currency_id = $7,
                updated_at = $8,
                version = version + 1
            WHERE product_id = $1 AND version = $2
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(product.version)
        .bind(&product.name)
        .bind(&product.image_url)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(product.currency_id.as_uuid())
        .bind(product.updated_at)
        .execute(session.conn()?)
        .await?;

        ensure_written(result.rows_affected())?;
        product.version += 1;
        Ok(())
    }

    async fn get(&self, product_id: &ProductId) -> StoreResult<Option<Product>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, ProductRow>(select_products!("WHERE product_id = $1"))
            .bind(product_id.as_uuid())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn get_by_shop(&self, shop_id: &ShopId, page: Page) -> StoreResult<Vec<Product>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, ProductRow>(select_products!(
            "WHERE shop_id = $1 ORDER BY created_at, product_id LIMIT $2 OFFSET $3"
        ))
        .bind(shop_id.as_uuid())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Product>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, ProductRow>(select_products!(
            "ORDER BY created_at, product_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn delete(&self, product_id: &ProductId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Cart Repository Implementation
// ============================================================================

impl CartRepository for PgMarketRepository {
    async fn add(&self, item: &ProductCart) -> StoreResult<()> {
        let mut session = self.session.lock().await;
        sqlx::query(
            r#"
            INSERT INTO product_carts (cart_id, user_id, product_id, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.cart_id.as_uuid())
        .bind(item.user_id.as_uuid())
        .bind(item.product_id.as_uuid())
        .bind(item.version)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(session.conn()?)
        .await?;

        Ok(())
    }

    async fn get(&self, cart_id: &ProductCartId) -> StoreResult<Option<ProductCart>> {
        let mut session = self.session.lock().await;
        let row = sqlx::query_as::<_, CartRow>(select_carts!("WHERE cart_id = $1"))
            .bind(cart_id.as_uuid())
            .fetch_optional(session.conn()?)
            .await?;

        Ok(row.map(CartRow::into_cart))
    }

    async fn get_by_user(&self, user_id: &UserId, page: Page) -> StoreResult<Vec<ProductCart>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, CartRow>(select_carts!(
            "WHERE user_id = $1 ORDER BY created_at, cart_id LIMIT $2 OFFSET $3"
        ))
        .bind(user_id.as_uuid())
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(CartRow::into_cart).collect())
    }

    async fn get_all_by_user(&self, user_id: &UserId) -> StoreResult<Vec<ProductCart>> {
        let mut session = self.session.lock().await;
        let rows = sqlx::query_as::<_, CartRow>(select_carts!(
            "WHERE user_id = $1 ORDER BY created_at, cart_id"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(session.conn()?)
        .await?;

        Ok(rows.into_iter().map(CartRow::into_cart).collect())
    }

    async fn delete(&self, cart_id: &ProductCartId) -> StoreResult<bool> {
        let mut session = self.session.lock().await;
        let result = sqlx::query("DELETE FROM product_carts WHERE cart_id = $1")
            .bind(cart_id.as_uuid())
            .execute(session.conn()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct CurrencyRow {
    currency_id: Uuid,
    code: String,
    symbol: String,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CurrencyRow {
    fn into_currency(self) -> Currency {
        Currency {
            currency_id: CurrencyId::from_uuid(self.currency_id),
            code: CurrencyCode::from_db(self.code),
            symbol: self.symbol,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ShopRow {
    shop_id: Uuid,
    seller_id: Uuid,
    name: String,
    description: Option<String>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ShopRow {
    fn into_shop(self) -> Shop {
        Shop {
            shop_id: ShopId::from_uuid(self.shop_id),
            seller_id: UserId::from_uuid(self.seller_id),
            name: self.name,
            description: self.description,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: Uuid,
    shop_id: Uuid,
    name: String,
    image_url: Option<String>,
    description: Option<String>,
    price: Decimal,
    currency_id: Uuid,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            product_id: ProductId::from_uuid(self.product_id),
            shop_id: ShopId::from_uuid(self.shop_id),
            name: self.name,
            image_url: self.image_url,
            description: self.description,
            price: Price::from_db(self.price),
            currency_id: CurrencyId::from_uuid(self.currency_id),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    cart_id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartRow {
    fn into_cart(self) -> ProductCart {
        ProductCart {
            cart_id: ProductCartId::from_uuid(self.cart_id),
            user_id: UserId::from_uuid(self.user_id),
            product_id: ProductId::from_uuid(self.product_id),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

//! In-memory repository used by the service tests

use kernel::error::store::StoreResult;
use kernel::id::{CurrencyId, ProductCartId, ProductId, ShopId, UserId};
use kernel::memory::{MemoryTable, Record, UniqueIndex};
use kernel::page::Page;
use uuid::Uuid;

use crate::domain::entity::{
    cart::ProductCart, currency::Currency, product::Product, shop::Shop,
};
use crate::domain::repository::{
    CartRepository, CurrencyRepository, ProductRepository, ShopRepository, constraint,
};
use crate::domain::value_object::currency_code::CurrencyCode;

macro_rules! record {
    ($ty:ty, $key:ident) => {
        impl Record for $ty {
            fn key(&self) -> Uuid {
                self.$key.into_uuid()
            }

            fn version(&self) -> i32 {
                self.version
            }

            fn version_mut(&mut self) -> &mut i32 {
                &mut self.version
            }
        }
    };
}

record!(Currency, currency_id);
record!(Shop, shop_id);
record!(Product, product_id);
record!(ProductCart, cart_id);

/// Tables mirroring the market schema
#[derive(Clone)]
pub struct MemoryMarketRepository {
    currencies: MemoryTable<Currency>,
    shops: MemoryTable<Shop>,
    products: MemoryTable<Product>,
    carts: MemoryTable<ProductCart>,
}

impl Default for MemoryMarketRepository {
    fn default() -> Self {
        Self {
            currencies: MemoryTable::new(vec![UniqueIndex::new(
                constraint::CURRENCIES_CODE_KEY,
                |c: &Currency| Some(c.code.as_str().to_string()),
            )]),
            shops: MemoryTable::default(),
            products: MemoryTable::default(),
            carts: MemoryTable::default(),
        }
    }
}

impl CurrencyRepository for MemoryMarketRepository {
    async fn add(&self, currency: &Currency) -> StoreResult<()> {
        self.currencies.insert(currency.clone()).await
    }

    async fn update(&self, currency: &mut Currency) -> StoreResult<()> {
        self.currencies.update(currency).await
    }

    async fn get(&self, currency_id: &CurrencyId) -> StoreResult<Option<Currency>> {
        Ok(self.currencies.get(currency_id.into_uuid()).await)
    }

    async fn get_by_code(&self, code: &CurrencyCode) -> StoreResult<Option<Currency>> {
        Ok(self.currencies.find(|c| c.code == *code).await)
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Currency>> {
        Ok(self.currencies.filter(|_| true, page).await)
    }

    async fn delete(&self, currency_id: &CurrencyId) -> StoreResult<bool> {
        Ok(self.currencies.remove(currency_id.into_uuid()).await)
    }
}

impl ShopRepository for MemoryMarketRepository {
    async fn add(&self, shop: &Shop) -> StoreResult<()> {
        self.shops.insert(shop.clone()).await
    }

    async fn update(&self, shop: &mut Shop) -> StoreResult<()> {
        self.shops.update(shop).await
    }

    async fn get(&self, shop_id: &ShopId) -> StoreResult<Option<Shop>> {
        Ok(self.shops.get(shop_id.into_uuid()).await)
    }

    async fn get_by_seller(&self, seller_id: &UserId) -> StoreResult<Option<Shop>> {
        Ok(self.shops.find(|s| s.seller_id == *seller_id).await)
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Shop>> {
        Ok(self.shops.filter(|_| true, page).await)
    }

    async fn delete(&self, shop_id: &ShopId) -> StoreResult<bool> {
        Ok(self.shops.remove(shop_id.into_uuid()).await)
    }
}

impl ProductRepository for MemoryMarketRepository {
    async fn add(&self, product: &Product) -> StoreResult<()> {
        self.products.insert(product.clone()).await
    }

    async fn update(&self, product: &mut Product) -> StoreResult<()> {
        self.products.update(product).await
    }

    async fn get(&self, product_id: &ProductId) -> StoreResult<Option<Product>> {
        Ok(self.products.get(product_id.into_uuid()).await)
    }

    async fn get_by_shop(&self, shop_id: &ShopId, page: Page) -> StoreResult<Vec<Product>> {
        Ok(self.products.filter(|p| p.shop_id == *shop_id, page).await)
    }

    async fn get_all(&self, page: Page) -> StoreResult<Vec<Product>> {
        Ok(self.products.filter(|_| true, page).await)
    }

    /// Cart rows go with the product, as `ON DELETE CASCADE` does
    async fn delete(&self, product_id: &ProductId) -> StoreResult<bool> {
        self.carts.remove_where(|c| c.product_id == *product_id).await;
        Ok(self.products.remove(product_id.into_uuid()).await)
    }
}

impl CartRepository for MemoryMarketRepository {
    async fn add(&self, item: &ProductCart) -> StoreResult<()> {
        self.carts.insert(item.clone()).await
    }

    async fn get(&self, cart_id: &ProductCartId) -> StoreResult<Option<ProductCart>> {
        Ok(self.carts.get(cart_id.into_uuid()).await)
    }

    async fn get_by_user(&self, user_id: &UserId, page: Page) -> StoreResult<Vec<ProductCart>> {
        Ok(self.carts.filter(|c| c.user_id == *user_id, page).await)
    }

    async fn get_all_by_user(&self, user_id: &UserId) -> StoreResult<Vec<ProductCart>> {
        Ok(self.carts.filter_all(|c| c.user_id == *user_id).await)
    }

    async fn delete(&self, cart_id: &ProductCartId) -> StoreResult<bool> {
        Ok(self.carts.remove(cart_id.into_uuid()).await)
    }
}

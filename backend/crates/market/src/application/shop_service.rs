//! Shop Service
//!
//! Sellers open one shop and manage its products. Every product mutation
//! checks that the acting user runs the product's shop.

use std::sync::Arc;

use kernel::error::store::StoreError;
use kernel::id::{ProductId, ShopId, UserId};
use kernel::page::Page;
use rust_decimal::Decimal;
use users::User;

use crate::domain::entity::{currency::Currency, product::Product, shop::Shop};
use crate::domain::repository::{
    CurrencyRepository, ProductRepository, ShopRepository, constraint,
};
use crate::domain::value_object::{currency_code::CurrencyCode, price::Price};
use crate::error::{MarketError, MarketResult};

/// Open shop input; the seller is always the acting user
pub struct OpenShopInput {
    pub name: String,
    pub description: Option<String>,
}

pub struct NewProductInput {
    pub name: String,
    pub price: Decimal,
    /// Code of an existing currency
    pub currency: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub expected_version: Option<i32>,
}

pub struct ShopService<S, P, C>
where
    S: ShopRepository,
    P: ProductRepository,
    C: CurrencyRepository,
{
    shop_repo: Arc<S>,
    product_repo: Arc<P>,
    currency_repo: Arc<C>,
}

impl<S, P, C> ShopService<S, P, C>
where
    S: ShopRepository,
    P: ProductRepository,
    C: CurrencyRepository,
{
    pub fn new(shop_repo: Arc<S>, product_repo: Arc<P>, currency_repo: Arc<C>) -> Self {
        Self {
            shop_repo,
            product_repo,
            currency_repo,
        }
    }

    pub async fn open_shop(&self, actor: &User, input: OpenShopInput) -> MarketResult<Shop> {
        let shop = Shop::new(actor.user_id, &input.name, input.description)?;

        if self.shop_repo.get_by_seller(&actor.user_id).await?.is_some() {
            return Err(MarketError::ShopAlreadyOpen);
        }
        self.shop_repo.add(&shop).await?;

        tracing::info!(shop_id = %shop.shop_id, seller_id = %actor.user_id, "Shop opened");

        Ok(shop)
    }

    pub async fn get_shop(&self, shop_id: &ShopId) -> MarketResult<Shop> {
        self.shop_repo
            .get(shop_id)
            .await?
            .ok_or(MarketError::ShopNotFound)
    }

    pub async fn shop_of_seller(&self, seller_id: &UserId) -> MarketResult<Shop> {
        self.shop_repo
            .get_by_seller(seller_id)
            .await?
            .ok_or(MarketError::ShopNotFound)
    }

    /// Products of an existing shop
    pub async fn list_products(&self, shop_id: &ShopId, page: Page) -> MarketResult<Vec<Product>> {
        self.get_shop(shop_id).await?;
        Ok(self.product_repo.get_by_shop(shop_id, page).await?)
    }

    pub async fn get_product(&self, product_id: &ProductId) -> MarketResult<Product> {
        self.product_repo
            .get(product_id)
            .await?
            .ok_or(MarketError::ProductNotFound)
    }

    pub async fn add_product(
        &self,
        actor: &User,
        shop_id: &ShopId,
        input: NewProductInput,
    ) -> MarketResult<Product> {
        let price = Price::new(input.price)?;
        let shop = self.get_shop(shop_id).await?;
        if !shop.is_run_by(&actor.user_id) {
            return Err(MarketError::NotOwner);
        }
        let currency = self.currency(&input.currency).await?;

        let product = Product::new(
            shop.shop_id,
            &input.name,
            price,
            currency.currency_id,
            input.image_url,
            input.description,
        )?;
        self.product_repo
            .add(&product)
            .await
            .map_err(price_violation)?;

        tracing::info!(
            product_id = %product.product_id,
            shop_id = %shop.shop_id,
            price = %product.price,
            currency = %currency.code,
            "Product added"
        );

        Ok(product)
    }

    pub async fn update_product(
        &self,
        actor: &User,
        product_id: &ProductId,
        input: UpdateProductInput,
    ) -> MarketResult<Product> {
        let mut product = self.owned_product(actor, product_id).await?;
        if input.expected_version.is_some_and(|v| v != product.version) {
            return Err(MarketError::Conflict);
        }

        let price = input.price.map(Price::new).transpose()?;
        let currency_id = match &input.currency {
            Some(code) => self.currency(code).await?.currency_id,
            None => product.currency_id,
        };

        if let Some(name) = &input.name {
            product.rename(name)?;
        }
        if price.is_some() || currency_id != product.currency_id {
            product.set_price(price.unwrap_or(product.price), currency_id);
        }
        if input.image_url.is_some() {
            product.set_image_url(input.image_url);
        }
        if input.description.is_some() {
            product.set_description(input.description);
        }

        self.product_repo
            .update(&mut product)
            .await
            .map_err(price_violation)?;

        tracing::info!(product_id = %product_id, version = product.version, "Product updated");

        Ok(product)
    }

    pub async fn remove_product(&self, actor: &User, product_id: &ProductId) -> MarketResult<()> {
        self.owned_product(actor, product_id).await?;

        if !self.product_repo.delete(product_id).await? {
            return Err(MarketError::ProductNotFound);
        }

        tracing::info!(product_id = %product_id, "Product removed");

        Ok(())
    }

    /// The product, if the actor runs its shop
    async fn owned_product(&self, actor: &User, product_id: &ProductId) -> MarketResult<Product> {
        let product = self.get_product(product_id).await?;
        let shop = self.get_shop(&product.shop_id).await?;
        if !shop.is_run_by(&actor.user_id) {
            return Err(MarketError::NotOwner);
        }
        Ok(product)
    }

    async fn currency(&self, code: &str) -> MarketResult<Currency> {
        let code = CurrencyCode::new(code)?;
        self.currency_repo
            .get_by_code(&code)
            .await?
            .ok_or(MarketError::CurrencyNotFound)
    }
}

/// The price CHECK backs up [`Price::new`]
fn price_violation(err: StoreError) -> MarketError {
    if err.constraint() == Some(constraint::PRODUCTS_PRICE_CHECK) {
        MarketError::Validation("Price cannot be negative".to_string())
    } else {
        err.into()
    }
}

//! Cart Service
//!
//! Cart rows belong to the acting user. Pricing turns the cart's products
//! into a [`LineItemList`], which also backs checkout.

use std::sync::Arc;

use kernel::id::{ProductCartId, ProductId};
use kernel::page::Page;
use rust_decimal::Decimal;
use users::User;

use crate::domain::entity::{cart::ProductCart, product::Product};
use crate::domain::payment::{
    Confirmation, CustomerDetails, LineItemList, PaymentGateway, PaymentRequest,
};
use crate::domain::repository::{CartRepository, CurrencyRepository, ProductRepository};
use crate::domain::value_object::currency_code::CurrencyCode;
use crate::error::{MarketError, MarketResult};

/// Priced cart contents
#[derive(Debug, Clone)]
pub struct CartSummary {
    pub items: LineItemList,
    pub total: Decimal,
    /// `None` for an empty cart
    pub currency: Option<CurrencyCode>,
}

pub struct CartService<C, P, K>
where
    C: CartRepository,
    P: ProductRepository,
    K: CurrencyRepository,
{
    cart_repo: Arc<C>,
    product_repo: Arc<P>,
    currency_repo: Arc<K>,
}

impl<C, P, K> CartService<C, P, K>
where
    C: CartRepository,
    P: ProductRepository,
    K: CurrencyRepository,
{
    pub fn new(cart_repo: Arc<C>, product_repo: Arc<P>, currency_repo: Arc<K>) -> Self {
        Self {
            cart_repo,
            product_repo,
            currency_repo,
        }
    }

    pub async fn add_to_cart(
        &self,
        actor: &User,
        product_id: &ProductId,
    ) -> MarketResult<ProductCart> {
        if self.product_repo.get(product_id).await?.is_none() {
            return Err(MarketError::ProductNotFound);
        }

        let item = ProductCart::new(actor.user_id, *product_id);
        self.cart_repo.add(&item).await?;

        tracing::info!(
            cart_id = %item.cart_id,
            product_id = %product_id,
            user_id = %actor.user_id,
            "Added to cart"
        );

        Ok(item)
    }

    pub async fn remove_from_cart(
        &self,
        actor: &User,
        cart_id: &ProductCartId,
    ) -> MarketResult<()> {
        let item = self
            .cart_repo
            .get(cart_id)
            .await?
            .ok_or(MarketError::CartItemNotFound)?;
        if item.user_id != actor.user_id {
            return Err(MarketError::NotOwner);
        }

        if !self.cart_repo.delete(cart_id).await? {
            return Err(MarketError::CartItemNotFound);
        }

        tracing::info!(cart_id = %cart_id, user_id = %actor.user_id, "Removed from cart");

        Ok(())
    }

    pub async fn list_cart(&self, actor: &User, page: Page) -> MarketResult<Vec<ProductCart>> {
        Ok(self.cart_repo.get_by_user(&actor.user_id, page).await?)
    }

    /// Price every product in the actor's cart
    ///
    /// All products must share one currency; an empty cart totals zero.
    pub async fn summarize(&self, actor: &User) -> MarketResult<CartSummary> {
        let products = self.cart_products(actor).await?;

        let currency_id = match products.split_first() {
            None => None,
            Some((first, rest)) => {
                if rest.iter().any(|p| p.currency_id != first.currency_id) {
                    return Err(MarketError::CurrencyMismatch);
                }
                Some(first.currency_id)
            }
        };
        let currency = match currency_id {
            Some(id) => Some(
                self.currency_repo
                    .get(&id)
                    .await?
                    .ok_or(MarketError::CurrencyNotFound)?
                    .code,
            ),
            None => None,
        };

        let items = LineItemList::new(products)?;
        Ok(CartSummary {
            total: items.total(),
            items,
            currency,
        })
    }

    /// Hand the priced cart to a gateway; returns the provider's payment id
    pub async fn checkout<G: PaymentGateway>(
        &self,
        actor: &User,
        customer: CustomerDetails,
        confirmation: Confirmation,
        gateway: &G,
    ) -> MarketResult<String> {
        let summary = self.summarize(actor).await?;
        let Some(currency) = summary.currency else {
            return Err(MarketError::EmptyCart);
        };

        let description = format!("Order of {} item(s)", summary.items.len());
        let request = PaymentRequest::new(
            summary.items,
            currency.as_str(),
            customer,
            confirmation,
            description,
        );
        let payment_id = gateway.create_payment(&request).await?;

        tracing::info!(
            user_id = %actor.user_id,
            payment_id = %payment_id,
            amount = %request.amount().value,
            currency = %request.amount().currency,
            "Checkout started"
        );

        Ok(payment_id)
    }

    /// Products behind the actor's cart rows, skipping ones removed since
    async fn cart_products(&self, actor: &User) -> MarketResult<Vec<Product>> {
        let rows = self.cart_repo.get_all_by_user(&actor.user_id).await?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            match self.product_repo.get(&row.product_id).await? {
                Some(product) => products.push(product),
                None => {
                    tracing::debug!(cart_id = %row.cart_id, "Cart row points at a removed product");
                }
            }
        }
        Ok(products)
    }
}

//! HTTP Handlers
//!
//! Reads go straight to the repository; writes go through the services and
//! commit the request's session.

use axum::Json;
use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use kernel::id::{ProductCartId, ProductId, ShopId, UserId};
use kernel::page::Page;
use kernel::session::PgSession;
use platform::bearer::BearerToken;
use sqlx::PgPool;
use std::sync::Arc;
use users::{UsersConfig, authenticate};

use crate::application::{
    CartService, NewProductInput, OpenShopInput, ShopService, UpdateProductInput,
};
use crate::domain::repository::{CurrencyRepository, ShopRepository};
use crate::error::MarketResult;
use crate::infra::postgres::PgMarketRepository;
use crate::presentation::dto::{
    AddToCartRequest, CartItemResponse, CartSummaryResponse, CreateProductRequest,
    CurrencyResponse, OpenShopRequest, ProductResponse, ShopResponse, UpdateProductRequest,
};

type Shops = ShopService<PgMarketRepository, PgMarketRepository, PgMarketRepository>;
type Carts = CartService<PgMarketRepository, PgMarketRepository, PgMarketRepository>;

/// Shared state for market handlers
#[derive(Clone)]
pub struct MarketState {
    pub pool: PgPool,
    pub users: Arc<UsersConfig>,
}

impl FromRef<MarketState> for PgPool {
    fn from_ref(state: &MarketState) -> Self {
        state.pool.clone()
    }
}

fn repo(session: &PgSession) -> Arc<PgMarketRepository> {
    Arc::new(PgMarketRepository::new(session.clone()))
}

fn shops(session: &PgSession) -> Shops {
    let repo = repo(session);
    ShopService::new(repo.clone(), repo.clone(), repo)
}

fn carts(session: &PgSession) -> Carts {
    let repo = repo(session);
    CartService::new(repo.clone(), repo.clone(), repo)
}

// ============================================================================
// Currencies
// ============================================================================

/// GET /currencies
pub async fn list_currencies(
    session: PgSession,
    Query(page): Query<Page>,
) -> MarketResult<Json<Vec<CurrencyResponse>>> {
    let currencies = CurrencyRepository::get_all(&*repo(&session), page).await?;
    Ok(Json(currencies.into_iter().map(Into::into).collect()))
}

// ============================================================================
// Shops
// ============================================================================

/// GET /shops
pub async fn list_shops(
    session: PgSession,
    Query(page): Query<Page>,
) -> MarketResult<Json<Vec<ShopResponse>>> {
    let shops = ShopRepository::get_all(&*repo(&session), page).await?;
    Ok(Json(shops.into_iter().map(Into::into).collect()))
}

/// GET /shops/{shop_id}
pub async fn get_shop(
    session: PgSession,
    Path(shop_id): Path<ShopId>,
) -> MarketResult<Json<ShopResponse>> {
    let shop = shops(&session).get_shop(&shop_id).await?;
    Ok(Json(shop.into()))
}

/// GET /users/{seller_id}/shops
pub async fn seller_shop(
    session: PgSession,
    Path(seller_id): Path<UserId>,
) -> MarketResult<Json<ShopResponse>> {
    let shop = shops(&session).shop_of_seller(&seller_id).await?;
    Ok(Json(shop.into()))
}

/// POST /shops
pub async fn open_shop(
    State(state): State<MarketState>,
    session: PgSession,
    bearer: BearerToken,
    Json(req): Json<OpenShopRequest>,
) -> MarketResult<(StatusCode, Json<ShopResponse>)> {
    let actor = authenticate(&session, &state.users, &bearer).await?;

    let shop = shops(&session)
        .open_shop(
            &actor,
            OpenShopInput {
                name: req.name,
                description: req.description,
            },
        )
        .await?;
    session.commit().await?;

    Ok((StatusCode::CREATED, Json(shop.into())))
}

// ============================================================================
// Products
// ============================================================================

/// GET /shops/{shop_id}/products
pub async fn shop_products(
    session: PgSession,
    Path(shop_id): Path<ShopId>,
    Query(page): Query<Page>,
) -> MarketResult<Json<Vec<ProductResponse>>> {
    let products = shops(&session).list_products(&shop_id, page).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// POST /shops/{shop_id}/products
pub async fn add_product(
    State(state): State<MarketState>,
    session: PgSession,
    bearer: BearerToken,
    Path(shop_id): Path<ShopId>,
    Json(req): Json<CreateProductRequest>,
) -> MarketResult<(StatusCode, Json<ProductResponse>)> {
    let actor = authenticate(&session, &state.users, &bearer).await?;

    let product = shops(&session)
        .add_product(
            &actor,
            &shop_id,
            NewProductInput {
                name: req.name,
                price: req.price,
                currency: req.currency,
                image_url: req.image_url,
                description: req.description,
            },
        )
        .await?;
    session.commit().await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /products/{product_id}
pub async fn get_product(
    session: PgSession,
    Path(product_id): Path<ProductId>,
) -> MarketResult<Json<ProductResponse>> {
    let product = shops(&session).get_product(&product_id).await?;
    Ok(Json(product.into()))
}

/// PUT /products/{product_id}
pub async fn update_product(
    State(state): State<MarketState>,
    session: PgSession,
    bearer: BearerToken,
    Path(product_id): Path<ProductId>,
    Json(req): Json<UpdateProductRequest>,
) -> MarketResult<Json<ProductResponse>> {
    let actor = authenticate(&session, &state.users, &bearer).await?;

    let product = shops(&session)
        .update_product(
            &actor,
            &product_id,
            UpdateProductInput {
                name: req.name,
                price: req.price,
                currency: req.currency,
                image_url: req.image_url,
                description: req.description,
                expected_version: req.expected_version,
            },
        )
        .await?;
    session.commit().await?;

    Ok(Json(product.into()))
}

/// DELETE /products/{product_id}
pub async fn remove_product(
    State(state): State<MarketState>,
    session: PgSession,
    bearer: BearerToken,
    Path(product_id): Path<ProductId>,
) -> MarketResult<StatusCode> {
    let actor = authenticate(&session, &state.users, &bearer).await?;

    shops(&session).remove_product(&actor, &product_id).await?;
    session.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Cart
// ============================================================================

/// GET /cart
pub async fn list_cart(
    State(state): State<MarketState>,
    session: PgSession,
    bearer: BearerToken,
    Query(page): Query<Page>,
) -> MarketResult<Json<Vec<CartItemResponse>>> {
    let actor = authenticate(&session, &state.users, &bearer).await?;

    let items = carts(&session).list_cart(&actor, page).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// POST /cart
pub async fn add_to_cart(
    State(state): State<MarketState>,
    session: PgSession,
    bearer: BearerToken,
    Json(req): Json<AddToCartRequest>,
) -> MarketResult<(StatusCode, Json<CartItemResponse>)> {
    let actor = authenticate(&session, &state.users, &bearer).await?;

    let item = carts(&session).add_to_cart(&actor, &req.product_id).await?;
    session.commit().await?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// DELETE /cart/{cart_id}
pub async fn remove_from_cart(
    State(state): State<MarketState>,
    session: PgSession,
    bearer: BearerToken,
    Path(cart_id): Path<ProductCartId>,
) -> MarketResult<StatusCode> {
    let actor = authenticate(&session, &state.users, &bearer).await?;

    carts(&session).remove_from_cart(&actor, &cart_id).await?;
    session.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /cart/summary
pub async fn cart_summary(
    State(state): State<MarketState>,
    session: PgSession,
    bearer: BearerToken,
) -> MarketResult<Json<CartSummaryResponse>> {
    let actor = authenticate(&session, &state.users, &bearer).await?;

    let summary = carts(&session).summarize(&actor).await?;
    Ok(Json(summary.into()))
}

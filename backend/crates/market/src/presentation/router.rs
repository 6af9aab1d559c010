use axum::{
    Router,
    routing::{delete, get},
};

pub use super::handlers::MarketState;
use super::handlers::{
    add_product, add_to_cart, cart_summary, get_product, get_shop, list_cart, list_currencies,
    list_shops, open_shop, remove_from_cart, remove_product, seller_shop, shop_products,
    update_product,
};

/// Build the market router
pub fn market_router(state: MarketState) -> Router {
    Router::new()
        .route("/currencies", get(list_currencies))
        .route("/users/{seller_id}/shops", get(seller_shop))
        .route("/shops", get(list_shops).post(open_shop))
        .route("/shops/{shop_id}", get(get_shop))
        .route(
            "/shops/{shop_id}/products",
            get(shop_products).post(add_product),
        )
        .route(
            "/products/{product_id}",
            get(get_product).put(update_product).delete(remove_product),
        )
        .route("/cart", get(list_cart).post(add_to_cart))
        .route("/cart/summary", get(cart_summary))
        .route("/cart/{cart_id}", delete(remove_from_cart))
        .with_state(state)
}

//! HTTP route handlers for the JSON API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /api/auth/signup            - Create account + session
//! POST   /api/auth/login             - Open session
//! POST   /api/auth/logout            - Drop session
//!
//! # Catalog
//! GET    /api/product                - List all products
//! POST   /api/product                - Create product (admin)
//! GET    /api/products/featured      - Cached featured list
//! GET    /api/products/recommendations - 4 random products
//! GET    /api/products/category/{category} - Filter by category
//! DELETE /api/products/{id}          - Delete product (admin)
//! PATCH  /api/products/{id}          - Toggle featured (admin)
//!
//! # Cart
//! GET    /api/cart                   - List cart joined with products
//! POST   /api/cart                   - Add one unit
//! DELETE /api/cart                   - Clear cart or remove one entry
//! PUT    /api/cart                   - Overwrite an entry's quantity
//!
//! # Coupons
//! GET    /api/coupons                - Caller's active coupon or null
//! POST   /api/coupons                - Validate a code
//! POST   /api/coupons/validate       - Same, alternate route
//!
//! # Payments
//! POST   /api/payments/create-checkout-session - Start provider checkout
//! POST   /api/payments/checkout-success        - Finalize order (idempotent)
//!
//! # Misc
//! POST   /api/generate-description   - AI marketing copy for an image (admin)
//! GET    /api/analytics              - Summary + trailing-7-day series (admin)
//! ```
//!
//! Requests with an unsupported method on a known path get a 405 with an
//! `Allow` header from axum's method router.

pub mod analytics;
pub mod auth;
pub mod cart;
pub mod coupons;
pub mod describe;
pub mod payments;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/product", get(products::list_all).post(products::create))
        .route("/products/featured", get(products::featured))
        .route("/products/recommendations", get(products::recommendations))
        .route("/products/category/{category}", get(products::by_category))
        .route(
            "/products/{id}",
            delete(products::remove).patch(products::toggle_featured),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new().route(
        "/cart",
        get(cart::list)
            .post(cart::add)
            .delete(cart::remove)
            .put(cart::set_quantity),
    )
}

/// Create the coupon routes router.
pub fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/coupons",
            get(coupons::get_active).post(coupons::validate),
        )
        .route("/coupons/validate", post(coupons::validate))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/payments/create-checkout-session",
            post(payments::create_checkout_session),
        )
        .route(
            "/payments/checkout-success",
            post(payments::checkout_success),
        )
}

/// Create the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .merge(Router::new().nest("/api", product_routes()))
        .merge(Router::new().nest("/api", cart_routes()))
        .merge(Router::new().nest("/api", coupon_routes()))
        .merge(Router::new().nest("/api", payment_routes()))
        .route("/api/generate-description", post(describe::generate))
        .route("/api/analytics", get(analytics::summary))
}

//! Checkout handlers.
//!
//! Creating a session prices the cart from the catalog (never from
//! client-sent amounts) and hands the priced line items to the payment
//! provider. Finalizing is idempotent on the provider session id: replays
//! return the existing order and skip every side effect.

use std::collections::HashMap;

use axum::{Json, extract::State};
use chrono::{Duration, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use basket_core::{CartItem, OrderId, UserId, cart};

use crate::db::coupons::{CouponRepository, NewCoupon};
use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::services::payments::{CheckoutLineItem, CreateSessionRequest};
use crate::state::AppState;

/// Paid total (in cents) at which a loyalty coupon is granted.
const GIFT_THRESHOLD_CENTS: i64 = 20_000;

/// Discount carried by a loyalty coupon.
const GIFT_DISCOUNT_PERCENTAGE: i32 = 10;

/// Loyalty coupon lifetime.
const GIFT_VALIDITY_DAYS: i64 = 30;

/// Metadata keys round-tripped through the payment provider.
mod metadata_keys {
    pub const USER_ID: &str = "user_id";
    pub const COUPON_CODE: &str = "coupon_code";
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutResponse {
    pub id: String,
    pub url: String,
    /// Discounted total in cents, as sent to the provider.
    pub total_amount: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSuccessRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSuccessResponse {
    pub message: &'static str,
    pub order_id: OrderId,
}

/// `POST /api/payments/create-checkout-session`.
///
/// Prices every cart entry from the live catalog, applies the caller's
/// coupon when one is named and still valid, and creates a provider
/// session carrying the user id (and applied coupon code) as metadata.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<CreateCheckoutRequest>,
) -> Result<Json<CreateCheckoutResponse>> {
    if body.cart_items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let products = ProductRepository::new(state.pool());

    let mut line_items = Vec::with_capacity(body.cart_items.len());
    let mut total_cents: i64 = 0;

    for item in &body.cart_items {
        let product = products
            .get(item.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let unit_cents = to_cents(product.price).ok_or_else(|| {
            AppError::Internal(format!("unrepresentable price on product {}", product.id))
        })?;
        total_cents += unit_cents * i64::from(item.quantity);

        line_items.push(CheckoutLineItem {
            name: product.name,
            image: (!product.image.is_empty()).then_some(product.image),
            amount: unit_cents,
            quantity: item.quantity,
        });
    }

    let coupon = match body.coupon_code.as_deref() {
        Some(code) => resolve_coupon(&state, user.id, code).await?,
        None => None,
    };

    let mut metadata = HashMap::new();
    metadata.insert(metadata_keys::USER_ID.to_string(), user.id.to_string());

    let discount_percentage = coupon.map(|(code, percentage)| {
        total_cents -= total_cents * i64::from(percentage) / 100;
        metadata.insert(metadata_keys::COUPON_CODE.to_string(), code);
        percentage
    });

    let base = &state.config().base_url;
    let session = state
        .payments()
        .create_checkout_session(&CreateSessionRequest {
            line_items,
            discount_percentage,
            success_url: format!("{base}/purchase-success?session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: format!("{base}/purchase-cancel"),
            metadata,
        })
        .await?;

    tracing::info!(user_id = %user.id, session_id = %session.id, total_cents, "checkout session created");

    Ok(Json(CreateCheckoutResponse {
        id: session.id,
        url: session.url,
        total_amount: total_cents,
    }))
}

/// `POST /api/payments/checkout-success`.
///
/// Verifies with the provider that the session was paid, then records the
/// order. The orders table is unique on the session id, so replaying this
/// call returns the already-recorded order without re-running the cart
/// clear, coupon consumption or loyalty grant.
pub async fn checkout_success(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<CheckoutSuccessRequest>,
) -> Result<Json<CheckoutSuccessResponse>> {
    let session = state.payments().get_session(&body.session_id).await?;

    if !session.is_paid() {
        return Err(AppError::BadRequest("Payment not completed".to_string()));
    }

    let user_id = user.id;
    let total = Decimal::new(session.amount_total, 2);
    let (order, created) = OrderRepository::new(state.pool())
        .create_if_absent(user_id, total, &session.id)
        .await?;

    if !created {
        tracing::info!(order_id = %order.id, session_id = %session.id, "checkout replayed");
        return Ok(Json(CheckoutSuccessResponse {
            message: "Order already processed",
            order_id: order.id,
        }));
    }

    let coupons = CouponRepository::new(state.pool());

    if let Some(code) = session.metadata.get(metadata_keys::COUPON_CODE) {
        consume_coupon(&coupons, user_id, code).await?;
    }

    // Same bounded compare-and-swap path as the cart handlers
    super::cart::mutate_cart(&UserRepository::new(state.pool()), user, |items| {
        cart::clear(items);
        Ok(())
    })
    .await?;

    if session.amount_total >= GIFT_THRESHOLD_CENTS {
        let coupon = coupons
            .create_replacing(NewCoupon {
                code: generate_gift_code(),
                user_id,
                discount_percentage: GIFT_DISCOUNT_PERCENTAGE,
                expiration_date: Utc::now() + Duration::days(GIFT_VALIDITY_DAYS),
            })
            .await?;
        tracing::info!(%user_id, coupon_id = %coupon.id, "loyalty coupon granted");
    }

    tracing::info!(order_id = %order.id, session_id = %session.id, "order recorded");

    Ok(Json(CheckoutSuccessResponse {
        message: "Payment successful and order created",
        order_id: order.id,
    }))
}

/// Resolve a coupon code for checkout pricing.
///
/// Unknown and expired codes are simply not applied; checkout pricing
/// never fails over a bad coupon. Expired codes are deactivated on the
/// way, same as validation.
async fn resolve_coupon(
    state: &AppState,
    user_id: UserId,
    code: &str,
) -> Result<Option<(String, i32)>> {
    let coupons = CouponRepository::new(state.pool());

    let Some(coupon) = coupons.active_by_code(code, user_id).await? else {
        return Ok(None);
    };

    if coupon.is_expired(Utc::now()) {
        coupons.deactivate(coupon.id).await?;
        tracing::info!(%user_id, coupon_id = %coupon.id, "coupon expired at checkout");
        return Ok(None);
    }

    Ok(Some((coupon.code, coupon.discount_percentage)))
}

/// Deactivate the coupon consumed by a paid checkout.
///
/// Missing here means it was already consumed or swept; not an error.
async fn consume_coupon(
    coupons: &CouponRepository<'_>,
    user_id: UserId,
    code: &str,
) -> Result<()> {
    if let Some(coupon) = coupons.active_by_code(code, user_id).await? {
        coupons.deactivate(coupon.id).await?;
        tracing::info!(%user_id, coupon_id = %coupon.id, "coupon consumed");
    }
    Ok(())
}

/// Whole-currency price to cents, rounded half-up to the cent.
fn to_cents(price: Decimal) -> Option<i64> {
    (price * Decimal::from(100)).round().to_i64()
}

/// `GIFT` plus a random uppercase alphanumeric suffix.
fn generate_gift_code() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("GIFT{}", suffix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cents() {
        assert_eq!(to_cents(Decimal::new(1999, 2)), Some(1999));
        assert_eq!(to_cents(Decimal::new(10, 0)), Some(1000));
        // Sub-cent prices round to the nearest cent
        assert_eq!(to_cents(Decimal::new(10005, 4)), Some(100));
    }

    #[test]
    fn test_gift_code_shape() {
        let code = generate_gift_code();
        assert!(code.starts_with("GIFT"));
        assert_eq!(code.len(), 13);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(code, code.to_uppercase());
    }

    #[test]
    fn test_discount_is_integer_percentage_off() {
        let mut total: i64 = 20_000;
        total -= total * 10 / 100;
        assert_eq!(total, 18_000);
    }
}

//! Coupon handlers.
//!
//! Expiry is lazy: an expired coupon is deactivated the first time someone
//! tries to validate it, and the caller gets the same 404 as for a code
//! that never existed. Logs carry the distinction.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::coupons::CouponRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::Coupon;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponResponse {
    pub message: &'static str,
    pub code: String,
    pub discount_percentage: i32,
}

/// What validation decided about a looked-up code.
#[derive(Debug)]
enum CodeOutcome {
    /// No active coupon with this code for this user.
    Missing,
    /// Active but past its expiration date: deactivate, then report missing.
    Expired(Coupon),
    /// Active and within its expiration date.
    Valid(Coupon),
}

/// `GET /api/coupons` - the caller's active coupon, or `null`.
pub async fn get_active(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Option<Coupon>>> {
    let coupon = CouponRepository::new(state.pool())
        .active_for_user(user.id)
        .await?;
    Ok(Json(coupon))
}

/// `POST /api/coupons` (and `/api/coupons/validate`) - validate a code.
///
/// Codes belong to a user; another user's code is a 404 here like any
/// unknown code. An expired code is deactivated on its first validation
/// and answers the same 404 as an unknown one, on that call and every
/// call after.
pub async fn validate(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<ValidateCouponRequest>,
) -> Result<Json<ValidateCouponResponse>> {
    let coupons = CouponRepository::new(state.pool());
    let coupon = coupons.active_by_code(&body.code, user.id).await?;

    match assess(coupon, Utc::now()) {
        CodeOutcome::Missing => Err(coupon_not_found()),
        CodeOutcome::Expired(coupon) => {
            coupons.deactivate(coupon.id).await?;
            tracing::info!(
                user_id = %user.id,
                coupon_id = %coupon.id,
                "coupon expired on validation"
            );
            Err(coupon_not_found())
        }
        CodeOutcome::Valid(coupon) => Ok(Json(ValidateCouponResponse {
            message: "Coupon is valid",
            code: coupon.code,
            discount_percentage: coupon.discount_percentage,
        })),
    }
}

/// Classify a looked-up code.
fn assess(coupon: Option<Coupon>, now: DateTime<Utc>) -> CodeOutcome {
    match coupon {
        None => CodeOutcome::Missing,
        Some(coupon) if coupon.is_expired(now) => CodeOutcome::Expired(coupon),
        Some(coupon) => CodeOutcome::Valid(coupon),
    }
}

/// The one 404 every failed validation answers with, so expired and
/// unknown codes are indistinguishable on the wire.
fn coupon_not_found() -> AppError {
    AppError::NotFound("Coupon not found".to_string())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use basket_core::{CouponId, UserId};

    use super::*;

    fn coupon(expiration_date: DateTime<Utc>) -> Coupon {
        Coupon {
            id: CouponId::new(1),
            code: "GIFTABC123XYZ".to_string(),
            user_id: UserId::new(1),
            discount_percentage: 10,
            expiration_date,
            is_active: true,
        }
    }

    #[test]
    fn test_valid_coupon_assessed_valid() {
        let now = Utc::now();
        let outcome = assess(Some(coupon(now + Duration::days(1))), now);
        assert!(matches!(outcome, CodeOutcome::Valid(_)));
    }

    #[test]
    fn test_expired_coupon_deactivates_then_looks_missing() {
        let now = Utc::now();

        // First validation: the active-but-expired coupon gets deactivated
        let outcome = assess(Some(coupon(now - Duration::days(1))), now);
        assert!(matches!(outcome, CodeOutcome::Expired(_)));

        // Second validation: the deactivated coupon no longer resolves
        let outcome = assess(None, now);
        assert!(matches!(outcome, CodeOutcome::Missing));
    }

    #[test]
    fn test_expired_and_unknown_codes_answer_the_same_404() {
        let expired_response = coupon_not_found();
        let unknown_response = coupon_not_found();

        match (&expired_response, &unknown_response) {
            (AppError::NotFound(a), AppError::NotFound(b)) => assert_eq!(a, b),
            other => panic!("expected matching 404s, got {other:?}"),
        }
    }
}

//! Coupon domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use basket_core::{CouponId, UserId};

/// A per-user, time-bounded discount code.
///
/// One active coupon is expected per user at a time. Expiry is enforced
/// lazily: the first validation after `expiration_date` flips `is_active`
/// to false; there is no background sweep.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Unique coupon ID.
    pub id: CouponId,
    /// Discount code as entered by the user.
    pub code: String,
    /// Owning user.
    pub user_id: UserId,
    /// Whole-number percentage off the cart total.
    pub discount_percentage: i32,
    /// Instant after which the coupon no longer validates.
    pub expiration_date: DateTime<Utc>,
    /// False once expired or consumed.
    pub is_active: bool,
}

impl Coupon {
    /// Whether the coupon's expiration date has passed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date < now
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn coupon(expiration_date: DateTime<Utc>) -> Coupon {
        Coupon {
            id: CouponId::new(1),
            code: "GIFT123".to_string(),
            user_id: UserId::new(1),
            discount_percentage: 10,
            expiration_date,
            is_active: true,
        }
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        assert!(coupon(now - Duration::seconds(1)).is_expired(now));
        assert!(!coupon(now + Duration::days(30)).is_expired(now));
    }
}

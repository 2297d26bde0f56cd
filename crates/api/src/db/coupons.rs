//! Coupon repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use basket_core::{CouponId, UserId};

use super::RepositoryError;
use crate::models::Coupon;

/// Columns selected for every coupon row.
const COUPON_COLUMNS: &str =
    "id, code, user_id, discount_percentage, expiration_date, is_active";

/// Fields for creating a coupon.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: String,
    pub user_id: UserId,
    pub discount_percentage: i32,
    pub expiration_date: DateTime<Utc>,
}

/// Repository for coupon database operations.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's active coupon, if any.
    ///
    /// One active coupon is expected per user; if several exist the most
    /// recently created wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_for_user(&self, user_id: UserId) -> Result<Option<Coupon>, RepositoryError> {
        let sql = format!(
            "SELECT {COUPON_COLUMNS} FROM store.coupons \
             WHERE user_id = $1 AND is_active \
             ORDER BY created_at DESC LIMIT 1"
        );
        let coupon = sqlx::query_as::<_, Coupon>(&sql)
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(coupon)
    }

    /// Get a user's active coupon by code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_by_code(
        &self,
        code: &str,
        user_id: UserId,
    ) -> Result<Option<Coupon>, RepositoryError> {
        let sql = format!(
            "SELECT {COUPON_COLUMNS} FROM store.coupons \
             WHERE code = $1 AND user_id = $2 AND is_active"
        );
        let coupon = sqlx::query_as::<_, Coupon>(&sql)
            .bind(code)
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(coupon)
    }

    /// Mark a coupon inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the coupon doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn deactivate(&self, id: CouponId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE store.coupons SET is_active = FALSE WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Create a coupon, deactivating any prior active coupons for the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement fails.
    pub async fn create_replacing(&self, fields: NewCoupon) -> Result<Coupon, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE store.coupons SET is_active = FALSE WHERE user_id = $1 AND is_active")
            .bind(fields.user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        let sql = format!(
            "INSERT INTO store.coupons (code, user_id, discount_percentage, expiration_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COUPON_COLUMNS}"
        );
        let coupon = sqlx::query_as::<_, Coupon>(&sql)
            .bind(&fields.code)
            .bind(fields.user_id.as_i32())
            .bind(fields.discount_percentage)
            .bind(fields.expiration_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(coupon)
    }
}

//! Order repository: creation and sales aggregation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use basket_core::UserId;

use super::RepositoryError;
use crate::models::Order;

/// Columns selected for every order row.
const ORDER_COLUMNS: &str = "id, user_id, total_amount, payment_session_id, created_at";

/// Totals across all orders.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct SalesSummary {
    pub total_sales: i64,
    pub total_revenue: Decimal,
}

/// Aggregated sales for one UTC calendar day that had at least one order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailySalesRow {
    /// Day as a `YYYY-MM-DD` string.
    pub day: String,
    pub sales: i64,
    pub revenue: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record an order for a provider session, once.
    ///
    /// The `payment_session_id` column is unique; if an order for this
    /// session already exists (a duplicate success callback), the existing
    /// order is returned and `created` is `false`. No other write happens
    /// in that case.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_if_absent(
        &self,
        user_id: UserId,
        total_amount: Decimal,
        payment_session_id: &str,
    ) -> Result<(Order, bool), RepositoryError> {
        let sql = format!(
            "INSERT INTO store.orders (user_id, total_amount, payment_session_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (payment_session_id) DO NOTHING \
             RETURNING {ORDER_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Order>(&sql)
            .bind(user_id.as_i32())
            .bind(total_amount)
            .bind(payment_session_id)
            .fetch_optional(self.pool)
            .await?;

        if let Some(order) = inserted {
            return Ok((order, true));
        }

        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM store.orders WHERE payment_session_id = $1"
        );
        let existing = sqlx::query_as::<_, Order>(&sql)
            .bind(payment_session_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok((existing, false))
    }

    /// Total order count and revenue in a single pass.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_summary(&self) -> Result<SalesSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, SalesSummary>(
            "SELECT COUNT(*) AS total_sales, \
                    COALESCE(SUM(total_amount), 0) AS total_revenue \
             FROM store.orders",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    /// Order count and revenue per UTC calendar day over an inclusive range.
    ///
    /// Days without orders are absent from the result; the caller fills
    /// them with zeros.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_sales(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailySalesRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailySalesRow>(
            "SELECT to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS day, \
                    COUNT(*) AS sales, \
                    COALESCE(SUM(total_amount), 0) AS revenue \
             FROM store.orders \
             WHERE created_at >= $1 AND created_at <= $2 \
             GROUP BY day \
             ORDER BY day",
        )
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

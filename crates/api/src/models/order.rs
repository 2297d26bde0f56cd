//! Order domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use basket_core::{OrderId, UserId};

/// A finalized purchase.
///
/// Created by the checkout-success handler once the payment provider
/// confirms the session was paid. Immutable after creation; the provider
/// session id is unique so duplicate success callbacks reuse the row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Purchasing user.
    pub user_id: UserId,
    /// Paid total in the store currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Payment provider checkout session id.
    pub payment_session_id: String,
    /// When the order was recorded.
    pub created_at: DateTime<Utc>,
}

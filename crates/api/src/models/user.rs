//! User domain types.

use chrono::{DateTime, Utc};

use basket_core::{CartItem, Email, Role, UserId};

/// A storefront user (domain type).
///
/// The cart is embedded in the user record as the source of truth for cart
/// state. `cart_version` guards cart writes: every save compares and bumps
/// it, so concurrent mutations retry instead of overwriting each other.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Authorization role.
    pub role: Role,
    /// Embedded cart entries, ordered by first add.
    pub cart_items: Vec<CartItem>,
    /// Optimistic-concurrency version of the cart.
    pub cart_version: i32,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this user may access admin-only routes.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

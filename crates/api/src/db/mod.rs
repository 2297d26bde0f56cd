//! Database operations for the Basket `PostgreSQL` database.
//!
//! # Schema: `store`
//!
//! - `users` - Accounts with the embedded cart (`cart_items` JSONB, versioned)
//! - `products` - Catalog
//! - `coupons` - Per-user discount codes
//! - `orders` - Finalized purchases (immutable)
//! - `sessions` - tower-sessions storage
//!
//! The pool is created once at startup and handed to [`crate::state::AppState`];
//! repositories borrow it per request. There are no process-wide singletons.
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and are NOT run on startup:
//! ```bash
//! sqlx migrate run --source crates/api/migrations
//! ```

pub mod coupons;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be decoded into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

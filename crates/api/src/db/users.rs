//! User repository for database operations.
//!
//! The cart is embedded in the user row as a JSONB column. Cart saves are
//! guarded by `cart_version`: the update only applies when the caller read
//! the version it is replacing, so concurrent read-modify-write cycles
//! retry instead of silently losing writes.

use sqlx::PgPool;
use sqlx::types::Json;

use basket_core::{CartItem, Email, Role, UserId};

use super::RepositoryError;
use crate::models::User;

/// Columns selected for every user row.
const USER_COLUMNS: &str = "id, email, role, cart_items, cart_version, created_at";

/// Row type decoded straight from `store.users`.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    role: String,
    cart_items: Json<Vec<CartItem>>,
    cart_version: i32,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            role: Role::from_str_or_default(&row.role),
            cart_items: row.cart_items.0,
            cart_version: row.cart_version,
            created_at: row.created_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM store.users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM store.users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    /// Create a new user with email, password hash and role.
    ///
    /// The cart starts empty at version 0.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO store.users (email, password_hash, role) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .bind(password_hash)
            .bind(role.as_str())
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("email already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        User::try_from(row)
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let sql = format!(
            "SELECT {USER_COLUMNS}, password_hash FROM store.users WHERE email = $1"
        );
        let row = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some((User::try_from(r.user)?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Save a user's cart, guarded by the version the caller read.
    ///
    /// Returns `true` if the save applied, `false` if another writer got
    /// there first (the caller should reload and re-apply its mutation).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn save_cart(
        &self,
        id: UserId,
        items: &[CartItem],
        expected_version: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE store.users \
             SET cart_items = $1, cart_version = cart_version + 1 \
             WHERE id = $2 AND cart_version = $3",
        )
        .bind(Json(items))
        .bind(id.as_i32())
        .bind(expected_version)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store.users")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

//! Product repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use basket_core::ProductId;

use super::RepositoryError;
use crate::models::{Product, RecommendedProduct};

/// Columns selected for every product row.
const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image, category, is_featured, created_at";

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Secure URL returned by the media host, or empty.
    pub image: String,
    pub category: String,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product, unpaginated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM store.products ORDER BY id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// List products in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products WHERE category = $1 ORDER BY id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// List products flagged as featured.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products WHERE is_featured ORDER BY id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Uniformly sample products, projected to the recommendation fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sample_recommended(
        &self,
        limit: i64,
    ) -> Result<Vec<RecommendedProduct>, RepositoryError> {
        let products = sqlx::query_as::<_, RecommendedProduct>(
            "SELECT id, name, description, image, price \
             FROM store.products ORDER BY random() LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM store.products WHERE id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(product)
    }

    /// Get the products whose IDs appear in `ids`, in id order.
    ///
    /// IDs with no matching product are simply absent from the result;
    /// the cart join relies on that to drop stale entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products WHERE id = ANY($1) ORDER BY id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(&raw_ids)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Create a product.
    ///
    /// No validation beyond what the column types enforce.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, fields: NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO store.products (name, description, price, image, category) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.price)
            .bind(&fields.image)
            .bind(&fields.category)
            .fetch_one(self.pool)
            .await?;

        Ok(product)
    }

    /// Delete a product.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM store.products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip a product's featured flag and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn toggle_featured(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "UPDATE store.products SET is_featured = NOT is_featured \
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(product)
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store.products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use basket_core::ProductId;

/// A catalog product.
///
/// The image URL points at the external media host; an empty string means
/// the product was created without an image. Deleting the product mirrors
/// the deletion to the media host (best effort).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Unit price in the store currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Externally-hosted image URL, or empty.
    pub image: String,
    /// Free-form category name.
    pub category: String,
    /// Whether the product appears in the cached featured list.
    pub is_featured: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// Reduced projection returned by the recommendations endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_shape_is_camel_case() {
        let product = Product {
            id: ProductId::new(1),
            name: "Mug".to_string(),
            description: "A mug".to_string(),
            price: Decimal::new(1999, 2),
            image: String::new(),
            category: "kitchen".to_string(),
            is_featured: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["isFeatured"], serde_json::json!(true));
        assert_eq!(json["price"], serde_json::json!(19.99));
        assert!(json.get("is_featured").is_none());
    }
}

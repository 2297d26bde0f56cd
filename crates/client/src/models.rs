//! Wire types for the API, camelCase on the wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use basket_core::{ProductId, UserId};

/// A catalog product as the API serves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub category: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

/// The reduced projection served by the recommendations endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Fields for creating a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Base64 image payload, omitted when the product has no image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: String,
}

/// The authenticated identity returned by signup and login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_from_wire_shape() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Denim Jacket",
            "description": "A jacket.",
            "price": 59.99,
            "image": "https://media.example.com/products/abc123.jpg",
            "category": "jackets",
            "isFeatured": true,
            "createdAt": "2024-06-01T12:00:00Z",
        }))
        .expect("deserialize");

        assert_eq!(product.id, ProductId::from(7));
        assert_eq!(product.price, Decimal::new(5999, 2));
        assert!(product.is_featured);
    }
}

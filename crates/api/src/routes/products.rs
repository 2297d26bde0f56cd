//! Catalog handlers.
//!
//! The featured list is served from an in-process cache of the serialized
//! response; every write that can change it (create is excluded - new
//! products are never featured) refreshes the cache from the database so
//! readers never see a stale toggle.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use basket_core::ProductId;

use crate::db::products::{NewProduct, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Product, RecommendedProduct};
use crate::services::media::{self, PRODUCTS_FOLDER};
use crate::state::AppState;

/// Number of products returned by the recommendations endpoint.
const RECOMMENDATION_COUNT: i64 = 4;

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Base64-encoded image payload, optional.
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `GET /api/product` - every product, unpaginated.
pub async fn list_all(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(ProductsResponse { products }))
}

/// `GET /api/products/category/{category}` - products in one category.
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ProductsResponse>> {
    let products = ProductRepository::new(state.pool())
        .list_by_category(&category)
        .await?;
    Ok(Json(ProductsResponse { products }))
}

/// `GET /api/products/featured` - featured products, cache first.
///
/// The cache stores the serialized response body, so a hit costs no
/// database round trip and no re-serialization.
pub async fn featured(State(state): State<AppState>) -> Result<Response> {
    if let Some(cached) = state.featured_cache().get().await {
        return Ok(json_body(cached));
    }

    let body = refresh_featured_cache(&state).await?;
    Ok(json_body(body))
}

/// `GET /api/products/recommendations` - a random sample for cross-sell.
pub async fn recommendations(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecommendedProduct>>> {
    let products = ProductRepository::new(state.pool())
        .sample_recommended(RECOMMENDATION_COUNT)
        .await?;
    Ok(Json(products))
}

/// `POST /api/product` - create a product (admin).
///
/// When an image payload is supplied it is uploaded to the media host
/// first and the product stores the returned hosted URL.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let image = match body.image.as_deref() {
        Some(data) if !data.is_empty() => {
            let uploaded = state.media().upload_base64(data, PRODUCTS_FOLDER).await?;
            uploaded.secure_url
        }
        _ => String::new(),
    };

    let product = ProductRepository::new(state.pool())
        .create(NewProduct {
            name: body.name,
            description: body.description,
            price: body.price,
            image,
            category: body.category,
        })
        .await?;

    tracing::info!(product_id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// `DELETE /api/products/{id}` - delete a product (admin).
///
/// The hosted image is removed best-effort: a media host failure is
/// logged but never blocks the catalog delete.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    let products = ProductRepository::new(state.pool());

    let product = products
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if !product.image.is_empty() {
        if let Some(public_id) = media::public_id_from_url(&product.image, PRODUCTS_FOLDER) {
            if let Err(error) = state.media().destroy(&public_id).await {
                tracing::warn!(product_id = %id, %error, "failed to delete hosted image");
            }
        }
    }

    products.delete(id).await?;

    tracing::info!(product_id = %id, "product deleted");

    Ok(Json(MessageResponse {
        message: "Product deleted successfully",
    }))
}

/// `PATCH /api/products/{id}` - flip the featured flag (admin).
pub async fn toggle_featured(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let updated = ProductRepository::new(state.pool())
        .toggle_featured(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    refresh_featured_cache(&state).await?;

    Ok(Json(updated))
}

/// Re-query the featured list and overwrite the cached response body.
async fn refresh_featured_cache(state: &AppState) -> Result<String> {
    let featured = ProductRepository::new(state.pool()).list_featured().await?;
    let body = serde_json::to_string(&featured)
        .map_err(|e| AppError::Internal(format!("serialize featured products: {e}")))?;
    state.featured_cache().set(body.clone()).await;
    Ok(body)
}

fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

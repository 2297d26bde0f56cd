//! Typed HTTP client for the API.
//!
//! Sessions ride on the cookie store, so one client instance is one
//! logged-in identity.

use serde::Deserialize;
use thiserror::Error;

use basket_core::ProductId;

use crate::models::{AuthUser, NewProduct, Product, RecommendedProduct};

/// Errors from API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// The `{message, error?}` body the API sends on failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// The `{products: [...]}` wrapper on list responses.
#[derive(Debug, Deserialize)]
struct ProductsBody {
    products: Vec<Product>,
}

/// Client for the storefront API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for an API at `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Create an account and open a session.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on rejection (409 for a taken email).
    pub async fn signup(&self, email: &str, password: &str) -> Result<AuthUser, ClientError> {
        let response = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await?;
        decode(response).await
    }

    /// Log in and open a session.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 401 on bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, ClientError> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({"email": email, "password": password}))
            .send()
            .await?;
        decode(response).await
    }

    /// Drop the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.client.post(self.url("/api/auth/logout")).send().await?;
        check(response).await?;
        Ok(())
    }

    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.client.get(self.url("/api/product")).send().await?;
        let body: ProductsBody = decode(response).await?;
        Ok(body.products)
    }

    /// Fetch products in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn fetch_by_category(&self, category: &str) -> Result<Vec<Product>, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/api/products/category/{category}")))
            .send()
            .await?;
        let body: ProductsBody = decode(response).await?;
        Ok(body.products)
    }

    /// Fetch the featured products (served as a bare array).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn fetch_featured(&self) -> Result<Vec<Product>, ClientError> {
        let response = self
            .client
            .get(self.url("/api/products/featured"))
            .send()
            .await?;
        decode(response).await
    }

    /// Fetch the random recommendation sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn fetch_recommendations(&self) -> Result<Vec<RecommendedProduct>, ClientError> {
        let response = self
            .client
            .get(self.url("/api/products/recommendations"))
            .send()
            .await?;
        decode(response).await
    }

    /// Create a product (requires an admin session).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 401/403 for missing privileges.
    pub async fn create_product(&self, fields: &NewProduct) -> Result<Product, ClientError> {
        let response = self
            .client
            .post(self.url("/api/product"))
            .json(fields)
            .send()
            .await?;
        decode(response).await
    }

    /// Delete a product (requires an admin session).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 404 for an unknown id.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/products/{id}")))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Flip a product's featured flag (requires an admin session).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 404 for an unknown id.
    pub async fn toggle_featured(&self, id: ProductId) -> Result<Product, ClientError> {
        let response = self
            .client
            .patch(self.url(&format!("/api/products/{id}")))
            .send()
            .await?;
        decode(response).await
    }
}

/// Turn an error status into `ClientError::Api`, preferring the API's
/// own `message` over the raw body.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map_or(text, |body| body.message);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let response = check(response).await?;
    Ok(response.json().await?)
}

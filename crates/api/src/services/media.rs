//! Media hosting provider client (image upload and deletion).
//!
//! Products store only the secure URL the host returns; the public id is
//! recovered from that URL when the image has to be destroyed alongside
//! its product.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;

use super::ProviderError;
use crate::config::MediaConfig;

/// Upload folder for product images.
pub const PRODUCTS_FOLDER: &str = "products";

/// Upload folder for description-generation scratch images.
pub const DESCRIPTIONS_FOLDER: &str = "product-descriptions";

/// A hosted image as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    /// Stable HTTPS URL to serve the image from.
    pub secure_url: String,
    /// Provider-side id, needed to destroy the asset.
    pub public_id: String,
}

/// Client for the media hosting provider.
#[derive(Clone)]
pub struct MediaClient {
    client: reqwest::Client,
    api_url: String,
}

impl MediaClient {
    /// Create a new media client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MediaConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ProviderError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    /// Upload a base64-encoded image into a folder.
    ///
    /// # Errors
    ///
    /// Returns error if the upload request fails or is rejected.
    pub async fn upload_base64(
        &self,
        image_base64: &str,
        folder: &str,
    ) -> Result<UploadedImage, ProviderError> {
        let url = format!("{}/image/upload", self.api_url);

        let body = serde_json::json!({
            "file": format!("data:image/jpeg;base64,{image_base64}"),
            "folder": folder,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let image: UploadedImage = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(image)
    }

    /// Destroy a hosted image by its public id.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects it.
    pub async fn destroy(&self, public_id: &str) -> Result<(), ProviderError> {
        let url = format!("{}/image/destroy", self.api_url);

        let body = serde_json::json!({ "public_id": public_id });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Derive the provider public id from a secure URL.
///
/// The id is `<folder>/<final path segment without extension>`, matching
/// how [`MediaClient::upload_base64`] files assets. Returns `None` for
/// URLs with no path segment.
#[must_use]
pub fn public_id_from_url(image_url: &str, folder: &str) -> Option<String> {
    let file = image_url.rsplit('/').next()?;
    if file.is_empty() {
        return None;
    }
    let stem = file.split('.').next().unwrap_or(file);
    Some(format!("{folder}/{stem}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_from_url() {
        assert_eq!(
            public_id_from_url(
                "https://media.example.com/products/abc123.jpg",
                PRODUCTS_FOLDER
            ),
            Some("products/abc123".to_string())
        );
    }

    #[test]
    fn test_public_id_without_extension() {
        assert_eq!(
            public_id_from_url("https://media.example.com/x/abc123", PRODUCTS_FOLDER),
            Some("products/abc123".to_string())
        );
    }

    #[test]
    fn test_public_id_empty_segment() {
        assert_eq!(public_id_from_url("https://media.example.com/", PRODUCTS_FOLDER), None);
    }
}

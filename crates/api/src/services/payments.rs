//! Payment provider client (checkout sessions).
//!
//! The provider owns all payment state. This client only creates a
//! checkout session from priced line items and later reads the session
//! back to confirm it was paid.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::ProviderError;
use crate::config::PaymentConfig;

/// A priced line item sent to the provider.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutLineItem {
    /// Product display name.
    pub name: String,
    /// Hosted image URL shown on the provider's checkout page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit amount in the smallest currency unit (cents).
    pub amount: i64,
    /// Number of units.
    pub quantity: u32,
}

/// A provider checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Provider session id.
    pub id: String,
    /// Redirect URL for the customer to complete payment.
    #[serde(default)]
    pub url: String,
    /// `"paid"` once the provider has collected payment.
    #[serde(default)]
    pub payment_status: String,
    /// Total collected, in cents.
    #[serde(default)]
    pub amount_total: i64,
    /// Opaque key/value pairs round-tripped through the provider.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    /// Whether the provider reports this session as paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

/// Parameters for creating a checkout session.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub line_items: Vec<CheckoutLineItem>,
    /// Whole-number percentage discount applied across the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<i32>,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: HashMap<String, String>,
}

/// Client for the payment provider.
#[derive(Clone)]
pub struct PaymentClient {
    client: reqwest::Client,
    api_url: String,
}

impl PaymentClient {
    /// Create a new payment client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PaymentConfig) -> Result<Self, ProviderError> {
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

    /// Create a checkout session.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects it.
    pub async fn create_checkout_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CheckoutSession, ProviderError> {
        let url = format!("{}/checkout/sessions", self.api_url);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(session)
    }

    /// Fetch a checkout session by id to verify its payment status.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the session is unknown.
    pub async fn get_session(&self, session_id: &str) -> Result<CheckoutSession, ProviderError> {
        let url = format!("{}/checkout/sessions/{session_id}", self.api_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_paid() {
        let session: CheckoutSession =
            serde_json::from_value(serde_json::json!({"id": "cs_1", "payment_status": "paid"}))
                .expect("deserialize");
        assert!(session.is_paid());

        let session: CheckoutSession =
            serde_json::from_value(serde_json::json!({"id": "cs_2", "payment_status": "unpaid"}))
                .expect("deserialize");
        assert!(!session.is_paid());
    }

    #[test]
    fn test_session_defaults_for_sparse_response() {
        // Session creation responses carry only id + url
        let session: CheckoutSession = serde_json::from_value(
            serde_json::json!({"id": "cs_3", "url": "https://pay.example.com/cs_3"}),
        )
        .expect("deserialize");
        assert_eq!(session.amount_total, 0);
        assert!(session.metadata.is_empty());
    }
}

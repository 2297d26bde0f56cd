//! External provider clients and the authentication service.
//!
//! The media host, payment provider and AI completion provider are all
//! consumed through small reqwest JSON clients. None of them retry;
//! failures surface as [`ProviderError`] and collapse to a 502 at the
//! handler boundary.

pub mod ai;
pub mod auth;
pub mod media;
pub mod payments;

use thiserror::Error;

pub use ai::CompletionClient;
pub use auth::{AuthError, AuthService};
pub use media::{MediaClient, UploadedImage};
pub use payments::{CheckoutLineItem, CheckoutSession, PaymentClient};

/// Errors from external provider calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a provider response.
    #[error("Parse error: {0}")]
    Parse(String),
}

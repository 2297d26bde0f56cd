//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::FeaturedCache;
use crate::config::ApiConfig;
use crate::services::{CompletionClient, MediaClient, PaymentClient, ProviderError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Every shared resource - the database pool,
/// the provider clients and the featured cache - is constructed once here
/// and handed to handlers through axum's `State`; nothing is a process
/// global.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    media: MediaClient,
    payments: PaymentClient,
    ai: CompletionClient,
    featured_cache: FeaturedCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if any provider client fails to build.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, ProviderError> {
        let media = MediaClient::new(&config.media)?;
        let payments = PaymentClient::new(&config.payment)?;
        let ai = CompletionClient::new(&config.ai)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                media,
                payments,
                ai,
                featured_cache: FeaturedCache::new(),
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the media hosting client.
    #[must_use]
    pub fn media(&self) -> &MediaClient {
        &self.inner.media
    }

    /// Get a reference to the payment provider client.
    #[must_use]
    pub fn payments(&self) -> &PaymentClient {
        &self.inner.payments
    }

    /// Get a reference to the AI completion client.
    #[must_use]
    pub fn ai(&self) -> &CompletionClient {
        &self.inner.ai
    }

    /// Get a reference to the featured-products cache.
    #[must_use]
    pub fn featured_cache(&self) -> &FeaturedCache {
        &self.inner.featured_cache
    }
}

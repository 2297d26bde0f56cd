//! Featured-products cache.
//!
//! A single-entry key-value cache memoizing the serialized featured list.
//! There is no TTL and no eviction policy: the entry lives until
//! `toggle_featured` refreshes it, and cache hits are returned verbatim.

use moka::future::Cache;

/// The one cache key.
const FEATURED_KEY: &str = "featured_products";

/// Cache for the serialized featured-product list.
#[derive(Clone)]
pub struct FeaturedCache {
    cache: Cache<&'static str, String>,
}

impl FeaturedCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().max_capacity(1).build(),
        }
    }

    /// Get the cached featured list JSON, if populated.
    pub async fn get(&self) -> Option<String> {
        self.cache.get(FEATURED_KEY).await
    }

    /// Replace the cached featured list JSON.
    pub async fn set(&self, json: String) {
        self.cache.insert(FEATURED_KEY, json).await;
    }
}

impl Default for FeaturedCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_miss_then_hit_verbatim() {
        let cache = FeaturedCache::new();
        assert!(cache.get().await.is_none());

        cache.set("[{\"id\":1}]".to_string()).await;
        assert_eq!(cache.get().await.as_deref(), Some("[{\"id\":1}]"));
    }

    #[tokio::test]
    async fn test_set_replaces_previous_value() {
        let cache = FeaturedCache::new();
        cache.set("[]".to_string()).await;
        cache.set("[{\"id\":2}]".to_string()).await;
        assert_eq!(cache.get().await.as_deref(), Some("[{\"id\":2}]"));
    }
}

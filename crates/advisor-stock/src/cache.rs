//! Caching layer for market data to reduce API calls

use cached::{Cached, TimedCache};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::{AdvisorError, Result};

/// Cache key for market data requests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Stock symbol
    pub symbol: String,
    /// API endpoint or operation type
    pub endpoint: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(symbol: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Thread-safe TTL cache for market data
///
/// Values are stored as JSON so one cache can hold daily series and
/// overview payloads alike; `get_or_fetch` round-trips through serde.
pub struct MarketCache {
    cache: Arc<RwLock<TimedCache<CacheKey, serde_json::Value>>>,
}

impl MarketCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: serde_json::Value) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a typed value using the provided fetcher function
    ///
    /// If a value exists under the key it is deserialized and returned
    /// immediately; otherwise the fetcher runs and its result is cached.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: CacheKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return serde_json::from_value(value).map_err(AdvisorError::from);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let value = fetcher().await?;
        self.insert(key, serde_json::to_value(&value)?).await;

        Ok(value)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for MarketCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

/// Tiered caches for the two data classes this system fetches
pub struct CacheManager {
    /// Cache for daily price data with short TTL
    pub price: MarketCache,
    /// Cache for fundamental data with longer TTL
    pub fundamental: MarketCache,
}

impl CacheManager {
    /// Create a new cache manager with specified TTLs
    pub fn new(price_ttl: Duration, fundamental_ttl: Duration) -> Self {
        Self {
            price: MarketCache::new(price_ttl),
            fundamental: MarketCache::new(fundamental_ttl),
        }
    }

    /// Clear all caches
    pub async fn clear_all(&self) {
        self.price.clear().await;
        self.fundamental.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = MarketCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", "quote");
        let value = serde_json::json!({"price": 150.0});

        cache.insert(key.clone(), value.clone()).await;

        let retrieved = cache.get(&key).await;
        assert_eq!(retrieved, Some(value));
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = MarketCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", "price");

        let mut call_count = 0;
        let result: f64 = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok(150.0) }
            })
            .await
            .unwrap();
        assert_eq!(result, 150.0);
        assert_eq!(call_count, 1);

        // Second call should use the cache
        let result: f64 = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok(999.0) }
            })
            .await
            .unwrap();
        assert_eq!(result, 150.0);
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_fetch_error_not_cached() {
        let cache = MarketCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", "price");

        let result: Result<f64> = cache
            .get_or_fetch(key.clone(), || async {
                Err(AdvisorError::Other("boom".to_string()))
            })
            .await;
        assert!(result.is_err());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_invalidation() {
        let cache = MarketCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", "quote");

        cache.insert(key.clone(), serde_json::json!(1)).await;
        assert!(cache.get(&key).await.is_some());

        cache.invalidate(&key).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_manager() {
        let manager = CacheManager::new(Duration::from_secs(60), Duration::from_secs(3600));
        let key = CacheKey::new("AAPL", "quote");

        manager.price.insert(key.clone(), serde_json::json!(1)).await;
        manager
            .fundamental
            .insert(key.clone(), serde_json::json!(2))
            .await;

        assert_eq!(manager.price.len().await, 1);
        assert_eq!(manager.fundamental.len().await, 1);

        manager.clear_all().await;

        assert!(manager.price.is_empty().await);
        assert!(manager.fundamental.is_empty().await);
    }
}

//! Application state management.

use crate::cache::ResponseCache;
use crate::config::{CacheConfig, QueryConfig};
use crate::db::RecordStore;
use std::sync::Arc;
use tracing::info;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store.
    pub store: Arc<dyn RecordStore>,
    /// Optional response cache.
    pub cache: Option<Arc<ResponseCache>>,
    /// Symbol filter strategies.
    pub query: QueryConfig,
}

impl AppState {
    /// Creates a new application state without a cache.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, query: QueryConfig) -> Self {
        Self {
            store,
            cache: None,
            query,
        }
    }

    /// Attaches a response cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Creates the application state from configuration.
    ///
    /// When caching is enabled this also starts the cache's expiry sweeper, so
    /// it must be called from within a Tokio runtime.
    #[must_use]
    pub fn from_config(
        store: Arc<dyn RecordStore>,
        query: QueryConfig,
        cache: &CacheConfig,
    ) -> Self {
        let state = Self::new(store, query);
        if !cache.enabled {
            info!("Response cache disabled");
            return state;
        }

        let response_cache = Arc::new(ResponseCache::new(cache.ttl()));
        drop(response_cache.spawn_sweeper(cache.sweep_interval()));
        info!(
            "Response cache enabled (ttl: {}s, sweep: {}s)",
            cache.ttl_secs, cache.sweep_interval_secs
        );

        state.with_cache(response_cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_from_config_with_cache() {
        let state = AppState::from_config(
            Arc::new(MemoryStore::default()),
            QueryConfig::default(),
            &CacheConfig::default(),
        );
        let cache = state.cache.expect("cache should be enabled");
        assert_eq!(cache.ttl().as_secs(), 300);
    }

    #[tokio::test]
    async fn test_from_config_without_cache() {
        let config = CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        };
        let state = AppState::from_config(
            Arc::new(MemoryStore::default()),
            QueryConfig::default(),
            &config,
        );
        assert!(state.cache.is_none());
    }
}

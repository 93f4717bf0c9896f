// src/fetch/mod.rs
// =============================================================================
// The Fetcher: a Transport plus an optional FetchCache.
//
// Submodules:
// - http: the Transport trait and the reqwest-backed implementation
// - cache: URL-keyed cache with TTL, capacity bound and single-flight
//
// Both the search page and every detail page are fetched through the same
// Fetcher, so they share one cache.
// =============================================================================

mod cache;
mod http;

pub use cache::FetchCache;
pub use http::{FetchResponse, FetchResult, ReqwestTransport, Transport, USER_AGENT};

use std::sync::Arc;
use std::time::Duration;

use crate::config::ScrapeConfig;

pub struct Fetcher {
    transport: Arc<dyn Transport>,
    cache: Option<FetchCache>,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, config: &ScrapeConfig) -> Self {
        let cache = config
            .cache_enabled()
            .then(|| FetchCache::new(config.cache_capacity, config.cache_ttl));

        Self {
            transport,
            cache,
            timeout: config.timeout,
        }
    }

    // Fetches `url`, answering from the cache when a live entry exists.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        match &self.cache {
            Some(cache) => {
                cache
                    .get_or_fetch(url, || self.transport.get(url, self.timeout))
                    .await
            }
            None => self.transport.get(url, self.timeout).await,
        }
    }

    pub fn cache(&self) -> Option<&FetchCache> {
        self.cache.as_ref()
    }
}

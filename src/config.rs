// src/config.rs
// =============================================================================
// Runtime settings for a scrape run.
//
// The CLI builds one of these from its flags; library users can start from
// ScrapeConfig::default() and override fields.
// =============================================================================

use std::time::Duration;

/// Origin of the SAFER registry. Relative carrier links are resolved
/// against it and the keyword search lives under it.
pub const SITE_ORIGIN: &str = "https://safer.fmcsa.dot.gov/";

/// Per-request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a cached page stays valid (one hour)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

pub const DEFAULT_CACHE_CAPACITY: usize = 512;

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Base URL of the registry; must end with '/' so relative links join
    /// onto it rather than replacing its last path segment
    pub origin: String,
    /// Timeout applied to every single fetch
    pub timeout: Duration,
    /// Validity window of a cache entry
    pub cache_ttl: Duration,
    /// Maximum number of cached URLs; 0 turns the cache off
    pub cache_capacity: usize,
    /// How many detail pages may be in flight at once (1 = sequential)
    pub concurrency: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            origin: SITE_ORIGIN.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            concurrency: 1,
        }
    }
}

impl ScrapeConfig {
    /// Same settings against a different origin (mirrors, local test servers)
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        let mut origin = origin.into();
        if !origin.ends_with('/') {
            origin.push('/');
        }
        self.origin = origin;
        self
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_capacity > 0 && !self.cache_ttl.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_registry() {
        let config = ScrapeConfig::default();
        assert_eq!(config.origin, "https://safer.fmcsa.dot.gov/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.concurrency, 1);
        assert!(config.cache_enabled());
    }

    #[test]
    fn test_with_origin_adds_trailing_slash() {
        let config = ScrapeConfig::default().with_origin("http://127.0.0.1:1234");
        assert_eq!(config.origin, "http://127.0.0.1:1234/");
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let config = ScrapeConfig {
            cache_capacity: 0,
            ..ScrapeConfig::default()
        };
        assert!(!config.cache_enabled());
    }
}

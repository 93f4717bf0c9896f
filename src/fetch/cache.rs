// src/fetch/cache.rs
// =============================================================================
// In-process cache of fetch results, keyed by normalized URL.
//
// How it works:
// 1. Each URL maps to a slot holding a tokio OnceCell
// 2. The first caller for a URL runs the fetch inside the cell
// 3. Concurrent callers for the same URL await that same cell, so there
//    is at most one request in flight per URL (single-flight)
// 4. Slots older than the TTL are treated as absent and replaced
// 5. When the cache is full, the oldest slot is evicted
//
// Both successes and failures are cached: a cached 404 answers exactly like
// the fresh 404 did.
//
// The map lives behind a std Mutex which is only held for bookkeeping,
// never across an .await.
// =============================================================================

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

use super::http::FetchResult;

#[derive(Debug)]
struct Slot {
    inserted: Instant,
    // Insertion order, used to pick the eviction victim
    seq: u64,
    cell: Arc<OnceCell<FetchResult>>,
}

#[derive(Debug, Default)]
struct Slots {
    map: HashMap<String, Slot>,
    next_seq: u64,
}

#[derive(Debug)]
pub struct FetchCache {
    capacity: usize,
    ttl: Duration,
    slots: Mutex<Slots>,
}

impl FetchCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            slots: Mutex::new(Slots::default()),
        }
    }

    // Returns the cached result for `url`, or runs `fetch` to produce it.
    //
    // Parameters:
    //   url: the URL being fetched (normalized before use as the key)
    //   fetch: produces the result on a miss; not called on a hit
    pub async fn get_or_fetch<F, Fut>(&self, url: &str, fetch: F) -> FetchResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult>,
    {
        let key = normalize_key(url);
        let cell = self.slot_for(&key);

        if let Some(result) = cell.get() {
            debug!(url = %key, "cache hit");
            return result.clone();
        }

        debug!(url = %key, "cache miss");
        cell.get_or_init(fetch).await.clone()
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .map
            .values()
            .filter(|slot| now.duration_since(slot.inserted) < self.ttl)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Finds the live slot for `key` or creates one, purging and evicting
    // as needed to stay within capacity.
    fn slot_for(&self, key: &str) -> Arc<OnceCell<FetchResult>> {
        let now = Instant::now();
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(slot) = slots.map.get(key) {
            if now.duration_since(slot.inserted) < self.ttl {
                return Arc::clone(&slot.cell);
            }
        }

        let ttl = self.ttl;
        slots
            .map
            .retain(|_, slot| now.duration_since(slot.inserted) < ttl);

        while slots.map.len() >= self.capacity {
            let oldest = slots
                .map
                .iter()
                .min_by_key(|(_, slot)| slot.seq)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(oldest) => {
                    debug!(url = %oldest, "cache evict");
                    slots.map.remove(&oldest);
                }
                None => break,
            }
        }

        let seq = slots.next_seq;
        slots.next_seq += 1;

        let cell = Arc::new(OnceCell::new());
        slots.map.insert(
            key.to_string(),
            Slot {
                inserted: now,
                seq,
                cell: Arc::clone(&cell),
            },
        );
        cell
    }
}

// Canonical form of a URL for use as a cache key.
// Scheme and host case, default ports and empty paths are normalized by the
// url crate; anything unparseable is used as-is (trimmed).
fn normalize_key(url: &str) -> String {
    let trimmed = url.trim();
    match Url::parse(trimmed) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

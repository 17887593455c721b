//! Per-owner snapshot cache keyed by locator.

use crate::fetch::{FetchError, Fetcher};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug)]
struct CacheEntry {
    locator: String,
    bytes: Vec<u8>,
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Single-entry-per-owner cache of fetched snapshots.
///
/// Each owner has its own slot lock, held across the fetch, so fetches for
/// the same owner are serialized while other owners proceed. The index lock
/// is only held long enough to look up or create a slot.
pub struct SnapshotCache<F> {
    fetcher: F,
    slots: Mutex<HashMap<String, Slot>>,
}

impl<F: Fetcher> SnapshotCache<F> {
    /// Create an empty cache backed by `fetcher`.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Get the snapshot for `owner_id`, fetching only if `locator` changed.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if a fetch was needed and failed; the
    /// previously cached entry is kept in that case.
    pub async fn get(&self, owner_id: &str, locator: &str) -> Result<Vec<u8>, FetchError> {
        let slot = self.slot(owner_id).await;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.locator == locator {
                tracing::trace!(owner_id, "Snapshot cache hit");
                return Ok(cached.bytes.clone());
            }
        }

        tracing::debug!(owner_id, "Snapshot locator changed, fetching");

        let bytes = self.fetcher.fetch(locator).await?;
        *entry = Some(CacheEntry {
            locator: locator.to_string(),
            bytes: bytes.clone(),
        });

        Ok(bytes)
    }

    #[cfg(test)]
    async fn cached_locator(&self, owner_id: &str) -> Option<String> {
        let slot = self.slots.lock().await.get(owner_id).cloned()?;
        let entry = slot.lock().await;
        entry.as_ref().map(|cached| cached.locator.clone())
    }

    #[cfg(test)]
    async fn slot_count(&self) -> usize {
        self.slots.lock().await.len()
    }

    async fn slot(&self, owner_id: &str) -> Slot {
        let mut slots = self.slots.lock().await;
        Arc::clone(slots.entry(owner_id.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Returns the locator bytes and counts calls; listed locators fail.
    #[derive(Default)]
    struct StubFetcher {
        calls: AtomicUsize,
        failing: HashSet<String>,
        delay: Option<Duration>,
    }

    impl Fetcher for StubFetcher {
        async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.contains(locator) {
                return Err(FetchError::Status(500));
            }
            Ok(locator.as_bytes().to_vec())
        }
    }

    #[tokio::test]
    async fn same_locator_fetches_once() {
        let cache = SnapshotCache::new(StubFetcher::default());

        let first = cache.get("cam1", "https://cdn/a.jpg").await.unwrap();
        let second = cache.get("cam1", "https://cdn/a.jpg").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn changed_locator_replaces_entry() {
        let cache = SnapshotCache::new(StubFetcher::default());

        cache.get("cam1", "https://cdn/a.jpg").await.unwrap();
        let bytes = cache.get("cam1", "https://cdn/b.jpg").await.unwrap();

        assert_eq!(bytes, b"https://cdn/b.jpg");
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.slot_count().await, 1);
        assert_eq!(
            cache.cached_locator("cam1").await.as_deref(),
            Some("https://cdn/b.jpg")
        );
    }

    #[tokio::test]
    async fn failed_fetch_keeps_last_good_entry() {
        let fetcher = StubFetcher {
            failing: HashSet::from(["https://cdn/broken.jpg".to_string()]),
            ..StubFetcher::default()
        };
        let cache = SnapshotCache::new(fetcher);

        cache.get("cam1", "https://cdn/a.jpg").await.unwrap();
        let err = cache.get("cam1", "https://cdn/broken.jpg").await.unwrap_err();
        assert_eq!(err, FetchError::Status(500));

        assert_eq!(
            cache.cached_locator("cam1").await.as_deref(),
            Some("https://cdn/a.jpg")
        );
        let bytes = cache.get("cam1", "https://cdn/a.jpg").await.unwrap();
        assert_eq!(bytes, b"https://cdn/a.jpg");
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn owners_are_independent() {
        let cache = SnapshotCache::new(StubFetcher::default());

        cache.get("cam1", "https://cdn/same.jpg").await.unwrap();
        cache.get("cam2", "https://cdn/same.jpg").await.unwrap();

        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.slot_count().await, 2);
        assert!(cache.cached_locator("cam3").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_does_not_block_other_owners() {
        let cache = Arc::new(SnapshotCache::new(StubFetcher {
            delay: Some(Duration::from_secs(10)),
            ..StubFetcher::default()
        }));

        let slow = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get("cam1", "https://cdn/a.jpg").await })
        };
        tokio::task::yield_now().await;

        // cam2 only needs the index lock, which cam1's fetch does not hold
        let started = tokio::time::Instant::now();
        cache.get("cam2", "https://cdn/b.jpg").await.unwrap();
        assert!(started.elapsed() <= Duration::from_secs(10));

        slow.await.unwrap().unwrap();
    }
}

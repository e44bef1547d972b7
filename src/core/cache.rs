//! Response cache - in-memory TTL cache for listing responses
//!
//! Values are kept as `serde_json::Value` so any DTO can be stored under a string key.
//! Keys are namespaced by prefix (`areas:`, `contatos:`) so writes can drop a whole namespace.
//! Every invalidation bumps the generation of its prefix. A load that started before an
//! invalidation does not get cached, so a write is never undone by an older snapshot.

use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

struct CacheEntry {
    inserted_at: Instant,
    value: serde_json::Value,
}

pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    generations: DashMap<String, AtomicU64>,
    ttl: Duration,
}

impl ResponseCache {
    /// A zero `ttl` disables caching entirely
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            generations: DashMap::new(),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    #[instrument(skip(self))]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.is_enabled() {
            return None;
        }

        let value = {
            let entry = self.entries.get(key)?;
            if entry.inserted_at.elapsed() < self.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        };

        match value {
            Some(value) => {
                debug!("Cache hit");
                serde_json::from_value(value).ok()
            }
            None => {
                debug!("Cache entry expired");
                self.entries.remove(key);
                None
            }
        }
    }

    #[instrument(skip(self, value))]
    pub fn insert<T: Serialize>(&self, key: &str, value: &T) {
        self.insert_if_generation(key, value, None);
    }

    /// Sum of the generations of every invalidated prefix `key` falls under
    fn generation(&self, key: &str) -> u64 {
        self.generations
            .iter()
            .filter(|entry| key.starts_with(entry.key().as_str()))
            .map(|entry| entry.value().load(Ordering::Acquire))
            .sum()
    }

    /// Inserts unless the key's generation moved away from `expected`.
    /// The check runs while the entry's shard is locked, and `invalidate_prefix` bumps the
    /// generation before it takes the shard locks, so a stale value cannot slip in between.
    fn insert_if_generation<T: Serialize>(&self, key: &str, value: &T, expected: Option<u64>) {
        if !self.is_enabled() {
            return;
        }
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to serialize value for cache: {:?}", e);
                return;
            }
        };

        let entry = self.entries.entry(key.to_string());
        if expected.is_some_and(|expected| expected != self.generation(key)) {
            debug!("Cache invalidated during load, value not stored");
            return;
        }
        entry.insert(CacheEntry {
            inserted_at: Instant::now(),
            value,
        });
    }

    /// Returns the cached value for `key`, or runs `load` and caches its result.
    /// The result is not cached when the key was invalidated while `load` ran.
    pub async fn get_or_try_insert<T, E, F, Fut>(&self, key: &str, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get(key) {
            return Ok(cached);
        }
        let generation = self.generation(key);
        let value = load().await?;
        self.insert_if_generation(key, &value, Some(generation));
        Ok(value)
    }

    /// Drops every entry whose key starts with `prefix`
    #[instrument(skip(self))]
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.generations
            .entry(prefix.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::AcqRel);
        self.entries.retain(|key, _| !key.starts_with(prefix));
        debug!("Cache invalidated");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[test]
    fn test_insert_and_get() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("areas:all", &vec![11, 31]);

        let cached: Option<Vec<i32>> = cache.get("areas:all");
        assert_eq!(cached, Some(vec![11, 31]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = ResponseCache::new(Duration::from_millis(10));
        cache.insert("areas:all", &"valor");
        std::thread::sleep(Duration::from_millis(30));

        let cached: Option<String> = cache.get("areas:all");
        assert!(cached.is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache.insert("areas:all", &1);

        assert!(!cache.is_enabled());
        assert!(cache.get::<i32>("areas:all").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_prefix_only_drops_namespace() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("contatos:all", &1);
        cache.insert("contatos:area=11", &2);
        cache.insert("areas:all", &3);

        cache.invalidate_prefix("contatos:");

        assert!(cache.get::<i32>("contatos:all").is_none());
        assert!(cache.get::<i32>("contatos:area=11").is_none());
        assert_eq!(cache.get::<i32>("areas:all"), Some(3));
    }

    #[tokio::test]
    async fn test_get_or_try_insert_loads_once() {
        let cache = ResponseCache::new(Duration::from_secs(60));

        let first: Result<i32, ()> = cache.get_or_try_insert("k", || async { Ok(7) }).await;
        let second: Result<i32, ()> = cache.get_or_try_insert("k", || async { Ok(99) }).await;

        assert_eq!(first, Ok(7));
        assert_eq!(second, Ok(7));
    }

    #[tokio::test]
    async fn test_invalidation_during_load_discards_loaded_value() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let (started_tx, started) = oneshot::channel::<()>();
        let (release, parked) = oneshot::channel::<()>();

        let (loaded, _) = tokio::join!(
            cache.get_or_try_insert("contatos:all", || async move {
                started_tx.send(()).map_err(|_| "canal fechado")?;
                parked.await.map_err(|_| "canal fechado")?;
                Ok::<_, &str>(2)
            }),
            async {
                started.await.unwrap();
                // the write lands while the listing is still loading
                cache.invalidate_prefix("contatos:");
                release.send(()).unwrap();
            }
        );

        assert_eq!(loaded, Ok(2));
        assert_eq!(cache.get::<i32>("contatos:all"), None);

        let reloaded: Result<i32, &str> =
            cache.get_or_try_insert("contatos:all", || async { Ok(3) }).await;
        assert_eq!(reloaded, Ok(3));
        assert_eq!(cache.get::<i32>("contatos:all"), Some(3));
    }

    #[tokio::test]
    async fn test_invalidating_other_namespace_keeps_loaded_value() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let (started_tx, started) = oneshot::channel::<()>();
        let (release, parked) = oneshot::channel::<()>();

        let (loaded, _) = tokio::join!(
            cache.get_or_try_insert("areas:all", || async move {
                started_tx.send(()).map_err(|_| "canal fechado")?;
                parked.await.map_err(|_| "canal fechado")?;
                Ok::<_, &str>(5)
            }),
            async {
                started.await.unwrap();
                cache.invalidate_prefix("contatos:");
                release.send(()).unwrap();
            }
        );

        assert_eq!(loaded, Ok(5));
        assert_eq!(cache.get::<i32>("areas:all"), Some(5));
    }

    #[tokio::test]
    async fn test_get_or_try_insert_does_not_cache_errors() {
        let cache = ResponseCache::new(Duration::from_secs(60));

        let failed: Result<i32, &str> = cache.get_or_try_insert("k", || async { Err("falha") }).await;
        assert_eq!(failed, Err("falha"));
        assert!(cache.is_empty());
    }
}

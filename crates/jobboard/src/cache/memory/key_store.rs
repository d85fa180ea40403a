//! In-memory key store with LRU eviction and lazy TTL expiry.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use jobboard_core::cache::{key_has_prefix, KeyStore, Result};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    /// `None` when the TTL is too large to represent; such entries only
    /// leave through invalidation or eviction.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    /// An entry is never served at or after its expiry instant.
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// In-memory [`KeyStore`] backed by `Arc<RwLock<LruCache>>`.
///
/// Expired entries are dropped when they are next read. Once `max_entries`
/// is reached the least recently used entry is evicted.
#[derive(Debug, Clone)]
pub struct MemoryKeyStore {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryKeyStore {
    /// Creates a store holding at most `max_entries` keys (at least one).
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of entries currently held, expired ones included.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // LRU reads update recency, so even `get` needs the write lock.
        let mut store = self.store.write().await;

        let expired = match store.get(key) {
            Some(entry) if entry.is_expired(Instant::now()) => true,
            Some(entry) => return Ok(Some(entry.value.clone())),
            None => return Ok(None),
        };

        if expired {
            store.pop(key);
        }
        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.write().await.pop(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<()> {
        let mut store = self.store.write().await;
        let doomed: Vec<String> = store
            .iter()
            .filter(|(key, _)| key_has_prefix(prefix, key))
            .map(|(key, _)| key.clone())
            .collect();
        for key in doomed {
            store.pop(&key);
        }
        Ok(())
    }
}

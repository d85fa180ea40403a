//! Cache-aside gateway used by the resource services.
//!
//! Reads go through [`CacheGateway::read_through`]; writes go through
//! [`CacheGateway::write_through`], which only invalidates after the mutation
//! succeeded. Cache failures never fail a request: they are logged and the
//! authoritative store answers instead.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use jobboard_core::cache::{from_cache_bytes, to_cache_bytes, CacheKey, Invalidation, KeyStore};

/// Outcome of [`CacheGateway::lookup`].
#[derive(Debug)]
pub enum CacheLookup<T> {
    Hit(T),
    /// Absent or undecodable; the caller may populate the key.
    Miss,
    /// The store could not be read; the caller should not populate.
    Unreachable,
}

#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn KeyStore>,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    /// Returns the cached value for `key`, or runs `loader` and caches its
    /// result for `ttl`.
    ///
    /// A loader error is returned unchanged and nothing is cached. An
    /// unreadable store or an undecodable entry falls back to the loader.
    pub async fn read_through<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        loader: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.lookup(key).await {
            CacheLookup::Hit(value) => Ok(value),
            CacheLookup::Miss => {
                let value = loader().await?;
                self.populate(key, &value, ttl).await;
                Ok(value)
            }
            CacheLookup::Unreachable => loader().await,
        }
    }

    /// Reads `key` without loading anything on a miss.
    ///
    /// Callers that must check the value before it is shared pair this with
    /// [`CacheGateway::populate`].
    pub async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> CacheLookup<T> {
        let cache_key = key.render();

        match self.store.get(&cache_key).await {
            Ok(Some(bytes)) => match from_cache_bytes::<T>(&bytes) {
                Ok(value) => {
                    tracing::trace!(key = %cache_key, "Cache hit");
                    CacheLookup::Hit(value)
                }
                Err(err) => {
                    tracing::warn!(
                        key = %cache_key,
                        error = %err,
                        "Cache entry undecodable, treating as miss"
                    );
                    CacheLookup::Miss
                }
            },
            Ok(None) => {
                tracing::trace!(key = %cache_key, "Cache miss");
                CacheLookup::Miss
            }
            Err(err) => {
                tracing::warn!(
                    key = %cache_key,
                    error = %err,
                    "Cache read failed, loading from store"
                );
                CacheLookup::Unreachable
            }
        }
    }

    /// Stores `value` under `key` for `ttl`. Failures are logged only.
    pub async fn populate<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let cache_key = key.render();

        match to_cache_bytes(value) {
            Ok(bytes) => {
                if let Err(err) = self.store.set_with_ttl(&cache_key, &bytes, ttl).await {
                    tracing::warn!(key = %cache_key, error = %err, "Failed to populate cache");
                }
            }
            Err(err) => {
                tracing::warn!(
                    key = %cache_key,
                    error = %err,
                    "Failed to encode value for cache"
                );
            }
        }
    }

    /// Runs `mutation`; on success applies every invalidation in order before
    /// returning its result. On failure nothing is invalidated.
    pub async fn write_through<T, E, Fut>(
        &self,
        mutation: Fut,
        invalidations: &[Invalidation],
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let value = mutation.await?;
        self.invalidate(invalidations).await;
        Ok(value)
    }

    /// Applies invalidations in order, logging and continuing past failures.
    pub async fn invalidate(&self, invalidations: &[Invalidation]) {
        for invalidation in invalidations {
            let result = match invalidation {
                Invalidation::Key(key) => self.store.delete(&key.render()).await,
                Invalidation::Prefix(prefix) => self.store.delete_prefix(prefix).await,
            };

            match result {
                Ok(()) => tracing::trace!(target = %invalidation.target(), "Invalidated"),
                Err(err) => tracing::warn!(
                    target = %invalidation.target(),
                    error = %err,
                    "Failed to invalidate cache"
                ),
            }
        }
    }
}

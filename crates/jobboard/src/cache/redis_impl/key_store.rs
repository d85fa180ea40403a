//! Redis key store.
//!
//! Prefix deletion walks the keyspace with `SCAN MATCH <prefix>*` and deletes
//! what it finds. SCAN does not block the server, but keys written while the
//! scan runs may be missed; the next invalidation or the TTL removes them.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use redis::AsyncCommands;

use jobboard_core::cache::{prefix_scan_pattern, KeyStore, Result};

use super::error::map_redis_error;

/// Redis [`KeyStore`] using a connection manager for reconnects.
pub struct RedisKeyStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisKeyStore {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Unavailable` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyStore for RedisKeyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        // SETEX takes whole seconds and rejects zero.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(map_redis_error)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(map_redis_error)
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<()> {
        if prefix.is_empty() {
            return Ok(());
        }

        let pattern = prefix_scan_pattern(prefix);
        let mut conn = self.conn.clone();

        let keys: Vec<String> = {
            let iter = conn
                .scan_match::<_, String>(&pattern)
                .await
                .map_err(map_redis_error)?;
            iter.collect().await
        };

        if keys.is_empty() {
            return Ok(());
        }

        tracing::trace!(prefix = %prefix, count = keys.len(), "Deleting keys by prefix");
        conn.del::<_, ()>(&keys).await.map_err(map_redis_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const LONG_TTL: Duration = Duration::from_secs(60);

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_store() -> Option<RedisKeyStore> {
        RedisKeyStore::new(&redis_url()).await.ok()
    }

    fn test_key(suffix: &str) -> String {
        format!("test:key_store:{}:{}", Uuid::new_v4(), suffix)
    }

    #[tokio::test]
    async fn test_redis_set_get_delete() {
        let Some(store) = get_test_store().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("roundtrip");
        store.set_with_ttl(&key, b"hello", LONG_TTL).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some(b"hello".to_vec()));

        store.delete(&key).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_ttl() {
        let Some(store) = get_test_store().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("ttl");
        store
            .set_with_ttl(&key, b"expiring", Duration::from_secs(1))
            .await
            .unwrap();
        assert!(store.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(store.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redis_delete_prefix() {
        let Some(store) = get_test_store().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let scope = format!("test:prefix:{}:", Uuid::new_v4());
        let first = format!("{scope}keyword=rust");
        let second = format!("{scope}location=quito");
        let other = test_key("unrelated");

        store.set_with_ttl(&first, b"1", LONG_TTL).await.unwrap();
        store.set_with_ttl(&second, b"2", LONG_TTL).await.unwrap();
        store.set_with_ttl(&other, b"3", LONG_TTL).await.unwrap();

        store.delete_prefix(&scope).await.unwrap();

        assert!(store.get(&first).await.unwrap().is_none());
        assert!(store.get(&second).await.unwrap().is_none());
        assert!(store.get(&other).await.unwrap().is_some());

        store.delete(&other).await.unwrap();
    }
}

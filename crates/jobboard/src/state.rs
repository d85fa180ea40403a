//! Shared application state.
//!
//! Handlers receive a clone of [`AppState`]: the two resource services and
//! the event bus, all backed by the same key store. The cache backend is
//! picked at compile time through the `memory` / `redis` features.

use std::sync::Arc;

use tokio::sync::broadcast;

use jobboard_core::cache::{EventBus, KeyStore};
use jobboard_core::storage::{ApplicationRepository, JobRepository, SavedJobRepository};

use crate::cache::CacheGateway;
use crate::config::Config;
use crate::services::{ApplicationService, JobService};
use crate::storage::InMemoryRepository;

#[derive(Clone)]
pub struct AppState {
    pub jobs: JobService,
    pub applications: ApplicationService,
    /// Event bus the services publish to and the SSE handler subscribes to.
    pub events: Arc<dyn EventBus>,
    /// Shutdown signal sender for SSE connections.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Wires the services over one repository, key store and event bus.
    pub fn build<R>(
        repo: Arc<R>,
        store: Arc<dyn KeyStore>,
        events: Arc<dyn EventBus>,
        config: &Config,
    ) -> Self
    where
        R: JobRepository + ApplicationRepository + SavedJobRepository + 'static,
    {
        let cache = CacheGateway::new(store);
        let jobs_repo: Arc<dyn JobRepository> = repo.clone();
        let applications_repo: Arc<dyn ApplicationRepository> = repo.clone();
        let saved_repo: Arc<dyn SavedJobRepository> = repo;

        let jobs = JobService::new(
            jobs_repo.clone(),
            applications_repo.clone(),
            saved_repo,
            cache.clone(),
            events.clone(),
        )
        .with_ttls(config.cache_ttl(), config.applications_cache_ttl())
        .with_listing_policy(config.listing_cache_policy);

        let applications =
            ApplicationService::new(jobs_repo, applications_repo, cache, events.clone())
                .with_ttl(config.applications_cache_ttl());

        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            jobs,
            applications,
            events,
            shutdown_tx,
        }
    }

    /// Subscribe to shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal all SSE connections to shut down.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

#[cfg(feature = "memory")]
mod memory_backend {
    use super::*;
    use crate::cache::{MemoryEventBus, MemoryKeyStore};

    impl AppState {
        /// Creates AppState with in-memory storage, key store and event bus.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(MemoryKeyStore::new(config.cache_max_entries));
            let events = Arc::new(MemoryEventBus::new(config.event_channel_capacity));

            tracing::info!(
                max_entries = config.cache_max_entries,
                "Using in-memory key store and event bus"
            );

            Ok(Self::build(
                Arc::new(InMemoryRepository::new()),
                store,
                events,
                config,
            ))
        }
    }
}

#[cfg(feature = "redis")]
mod redis_backend {
    use super::*;
    use crate::cache::{RedisEventBus, RedisKeyStore};

    impl AppState {
        /// Creates AppState with in-memory storage and a Redis key store and
        /// event bus, so several instances share invalidations and events.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(RedisKeyStore::new(&config.redis_url).await?);
            let events = Arc::new(
                RedisEventBus::new(&config.redis_url, config.event_channel_capacity).await?,
            );

            tracing::info!(redis_url = %config.redis_url, "Using Redis key store and event bus");

            Ok(Self::build(
                Arc::new(InMemoryRepository::new()),
                store,
                events,
                config,
            ))
        }
    }
}

#[cfg(test)]
impl Default for AppState {
    fn default() -> Self {
        use crate::cache::{MemoryEventBus, MemoryKeyStore};

        let config = Config::default();
        Self::build(
            Arc::new(InMemoryRepository::new()),
            Arc::new(MemoryKeyStore::new(config.cache_max_entries)),
            Arc::new(MemoryEventBus::new(config.event_channel_capacity)),
            &config,
        )
    }
}

//! Redis-backed event bus for multi-instance deployments.
//!
//! Every instance PUBLISHes events as JSON on one channel and runs a single
//! background listener that forwards what it receives into a local
//! [`MemoryEventBus`]. Local subscribers therefore see events published by
//! any instance, including their own.

use async_trait::async_trait;
use futures_util::StreamExt;
use redis::AsyncCommands;
use tokio::task::JoinHandle;

use jobboard_core::cache::{
    CacheError, EventBus, Result, SubscriberId, Subscription, EVENTS_CHANNEL,
};
use jobboard_core::events::JobBoardEvent;

use super::error::map_redis_error;
use crate::cache::MemoryEventBus;

pub struct RedisEventBus {
    conn: redis::aio::ConnectionManager,
    local: MemoryEventBus,
    listener: JoinHandle<()>,
}

impl RedisEventBus {
    /// Connects to Redis and starts the channel listener.
    ///
    /// The subscription is confirmed before this returns, so events
    /// published afterwards are not missed.
    pub async fn new(url: &str, channel_capacity: usize) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client.clone())
            .await
            .map_err(map_redis_error)?;

        let mut pubsub = client.get_async_pubsub().await.map_err(map_redis_error)?;
        pubsub
            .subscribe(EVENTS_CHANNEL)
            .await
            .map_err(map_redis_error)?;

        let local = MemoryEventBus::new(channel_capacity);
        let forward_to = local.clone();

        let listener = tokio::spawn(async move {
            let mut messages = pubsub.into_on_message();

            while let Some(msg) = messages.next().await {
                let payload: String = match msg.get_payload() {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(error = %e, "Unreadable event payload");
                        continue;
                    }
                };

                match serde_json::from_str::<JobBoardEvent>(&payload) {
                    Ok(event) => forward_to.broadcast(&event),
                    Err(e) => {
                        tracing::warn!(error = %e, payload = %payload, "Failed to decode event");
                    }
                }
            }

            tracing::info!(channel = EVENTS_CHANNEL, "Redis event stream ended");
        });

        Ok(Self {
            conn,
            local,
            listener,
        })
    }
}

impl Drop for RedisEventBus {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

#[async_trait]
impl EventBus for RedisEventBus {
    async fn publish(&self, event: &JobBoardEvent) -> Result<()> {
        let payload =
            serde_json::to_string(event).map_err(|e| CacheError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(EVENTS_CHANNEL, &payload)
            .await
            .map_err(|e| CacheError::PublishFailed(e.to_string()))
    }

    async fn subscribe(&self) -> Result<Subscription> {
        self.local.subscribe().await
    }

    async fn unsubscribe(&self, id: SubscriberId) {
        self.local.unsubscribe(id).await;
    }

    fn subscriber_count(&self) -> usize {
        self.local.subscriber_count()
    }
}

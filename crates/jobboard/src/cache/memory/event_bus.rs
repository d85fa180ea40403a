//! In-process event bus with bounded per-subscriber channels.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};

use jobboard_core::cache::{EventBus, Result, SubscriberId, Subscription};
use jobboard_core::events::JobBoardEvent;

/// Default per-subscriber buffer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

type Registry = HashMap<SubscriberId, mpsc::Sender<JobBoardEvent>>;

/// In-memory [`EventBus`].
///
/// Each subscriber gets its own bounded channel. Publishing never waits on a
/// subscriber: a full channel drops the event for that subscriber only, and
/// a closed channel removes the subscriber from the registry.
#[derive(Debug, Clone)]
pub struct MemoryEventBus {
    subscribers: Arc<RwLock<Registry>>,
    capacity: usize,
}

impl MemoryEventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Delivers an event to local subscribers. Infallible.
    pub fn broadcast(&self, event: &JobBoardEvent) {
        let mut closed = Vec::new();

        {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);

            for (id, sender) in subscribers.iter() {
                match sender.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(
                            subscriber_id = %id,
                            event_type = event.event_type(),
                            "Subscriber channel full, dropping event"
                        );
                    }
                    Err(TrySendError::Closed(_)) => closed.push(*id),
                }
            }
        }

        if !closed.is_empty() {
            let mut subscribers = self
                .subscribers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            for id in closed {
                subscribers.remove(&id);
                tracing::debug!(subscriber_id = %id, "Removed disconnected subscriber");
            }
        }
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: &JobBoardEvent) -> Result<()> {
        self.broadcast(event);
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription> {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = SubscriberId::new();

        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, sender);

        tracing::debug!(subscriber_id = %id, "Subscriber registered");
        Ok(Subscription::new(id, receiver))
    }

    async fn unsubscribe(&self, id: SubscriberId) {
        let removed = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        if removed.is_some() {
            tracing::debug!(subscriber_id = %id, "Subscriber unregistered");
        }
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::StreamExt;
    use uuid::Uuid;

    use super::*;

    fn deleted(n: u128) -> JobBoardEvent {
        JobBoardEvent::job_deleted(Uuid::from_u128(n))
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let bus = MemoryEventBus::default();
        let mut sub = bus.subscribe().await.unwrap();

        for n in 0..5 {
            bus.publish(&deleted(n)).await.unwrap();
        }

        for n in 0..5 {
            assert_eq!(sub.recv().await, Some(deleted(n)));
        }
    }

    #[tokio::test]
    async fn test_every_subscriber_gets_every_event() {
        let bus = MemoryEventBus::default();
        let mut first = bus.subscribe().await.unwrap();
        let mut second = bus.subscribe().await.unwrap();

        bus.publish(&deleted(1)).await.unwrap();

        assert_eq!(first.recv().await, Some(deleted(1)));
        assert_eq!(second.recv().await, Some(deleted(1)));
    }

    #[tokio::test]
    async fn test_no_backlog_for_late_subscriber() {
        let bus = MemoryEventBus::default();
        bus.publish(&deleted(1)).await.unwrap();

        let mut sub = bus.subscribe().await.unwrap();
        bus.publish(&deleted(2)).await.unwrap();

        assert_eq!(sub.recv().await, Some(deleted(2)));
    }

    #[tokio::test]
    async fn test_nothing_delivered_after_unsubscribe() {
        let bus = MemoryEventBus::default();
        let mut sub = bus.subscribe().await.unwrap();

        bus.publish(&deleted(1)).await.unwrap();
        bus.unsubscribe(sub.id()).await;
        bus.publish(&deleted(2)).await.unwrap();

        assert_eq!(sub.recv().await, Some(deleted(1)));
        assert_eq!(sub.recv().await, None, "stream ends after unsubscribe");
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let bus = MemoryEventBus::default();
        let sub = bus.subscribe().await.unwrap();

        bus.unsubscribe(sub.id()).await;
        bus.unsubscribe(sub.id()).await;
        bus.unsubscribe(SubscriberId::new()).await;

        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_pruned_on_publish() {
        let bus = MemoryEventBus::default();
        let sub = bus.subscribe().await.unwrap();
        let _live = bus.subscribe().await.unwrap();
        assert_eq!(bus.subscriber_count(), 2);

        drop(sub);
        bus.publish(&deleted(1)).await.unwrap();

        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_full_subscriber_does_not_block_publish() {
        let bus = MemoryEventBus::new(2);
        let mut slow = bus.subscribe().await.unwrap();
        let mut fast = bus.subscribe().await.unwrap();

        let publish_all = async {
            for n in 0..10 {
                bus.publish(&deleted(n)).await.unwrap();
                // The fast subscriber keeps up; the slow one never reads.
                assert_eq!(fast.recv().await, Some(deleted(n)));
            }
        };
        tokio::time::timeout(Duration::from_secs(1), publish_all)
            .await
            .expect("publish must not block on a full subscriber");

        // The slow subscriber kept only what fit in its buffer.
        assert_eq!(slow.recv().await, Some(deleted(0)));
        assert_eq!(slow.recv().await, Some(deleted(1)));
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_subscription_is_a_stream() {
        let bus = MemoryEventBus::default();
        let sub = bus.subscribe().await.unwrap();

        bus.publish(&deleted(1)).await.unwrap();
        bus.publish(&deleted(2)).await.unwrap();
        bus.unsubscribe(sub.id()).await;

        let events: Vec<JobBoardEvent> = sub.collect().await;
        assert_eq!(events, vec![deleted(1), deleted(2)]);
    }
}

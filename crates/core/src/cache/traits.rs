use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::Stream;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::events::JobBoardEvent;

use super::Result;

/// Key-value store backing the read cache.
///
/// Implementations synchronize internally; callers share one instance
/// across every request without extra locking.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Gets a value by key. Missing and expired keys both yield `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a value, overwriting any previous one, expiring after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Deletes a key. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes every key starting with `prefix`.
    async fn delete_prefix(&self, prefix: &str) -> Result<()>;
}

/// Identifier of a live event-bus subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subscriber's handle on the bus: its id plus the stream of events
/// published after it subscribed.
///
/// The stream ends when the subscriber is removed from the bus.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<JobBoardEvent>,
}

impl Subscription {
    pub fn new(id: SubscriberId, receiver: mpsc::Receiver<JobBoardEvent>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Waits for the next event. Returns `None` once the subscription ended.
    pub async fn recv(&mut self) -> Option<JobBoardEvent> {
        self.receiver.recv().await
    }
}

impl Stream for Subscription {
    type Item = JobBoardEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Fan-out of job-board events to connected listeners.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Delivers an event to every current subscriber.
    ///
    /// Must not wait on slow subscribers. Subscribers whose connection is
    /// gone are dropped from the registry instead of failing the call.
    async fn publish(&self, event: &JobBoardEvent) -> Result<()>;

    /// Registers a new subscriber. No backlog is replayed.
    async fn subscribe(&self) -> Result<Subscription>;

    /// Removes a subscriber. Unknown ids are ignored.
    async fn unsubscribe(&self, id: SubscriberId);

    /// Number of subscribers currently registered on this instance.
    fn subscriber_count(&self) -> usize;
}

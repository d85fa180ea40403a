//! Cache backend implementations and the cache-aside gateway.
//!
//! The backends implement the `KeyStore` and `EventBus` traits defined in
//! `jobboard_core::cache` and are selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `memory` (default): in-process LRU key store and event bus
//! - `redis`: Redis key store and Redis pub/sub event bus
//!
//! These features are mutually exclusive - only one cache backend can be
//! enabled at a time.

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p jobboard --features memory"
);

mod gateway;

// Always compiled: the redis event bus fans out through a local memory bus.
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use gateway::{CacheGateway, CacheLookup};
pub use memory::{MemoryEventBus, MemoryKeyStore};

#[cfg(feature = "redis")]
pub use redis_impl::{RedisEventBus, RedisKeyStore};

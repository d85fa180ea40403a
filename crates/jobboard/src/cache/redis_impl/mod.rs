//! Redis cache backend.
//!
//! Distributed key store and cross-instance event bus for multi-instance
//! deployments.

mod error;
mod event_bus;
mod key_store;

pub use event_bus::RedisEventBus;
pub use key_store::RedisKeyStore;

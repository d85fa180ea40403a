//! In-memory cache backend.
//!
//! Single-instance deployments: the key store and the event bus both live in
//! the server process.

#![cfg_attr(not(feature = "memory"), allow(dead_code))]

mod event_bus;
mod key_store;

pub use event_bus::MemoryEventBus;
pub use key_store::MemoryKeyStore;

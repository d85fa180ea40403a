//! In-memory authoritative store.
//!
//! Stores jobs, applications and saved jobs in HashMaps wrapped in
//! `Arc<RwLock<_>>`. Persistence engines plug in behind the same
//! repository traits.

mod repository;

pub use repository::InMemoryRepository;

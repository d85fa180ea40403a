//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `jobboard_core::storage`.

pub mod inmemory;

pub use inmemory::InMemoryRepository;

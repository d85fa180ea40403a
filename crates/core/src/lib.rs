//! Core domain types and contracts for the jobboard server.
//!
//! Everything in this crate is free of I/O: the cache and event-bus traits
//! describe what the server's backends must provide, and the domain modules
//! hold pure data types, validation and invalidation rules.

pub mod applications;
pub mod auth;
pub mod cache;
pub mod events;
pub mod jobs;
pub mod serde;
pub mod storage;

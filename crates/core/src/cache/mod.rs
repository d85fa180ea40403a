mod error;
mod invalidation;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use invalidation::{
    application_invalidation_set, job_invalidation_set, ApplicationMutation, Invalidation,
    JobMutation,
};
pub use keys::{CacheKey, EVENTS_CHANNEL, JOB_LISTING_PREFIX};
pub use patterns::{escape_glob, key_has_prefix, prefix_scan_pattern};
pub use serialization::{from_cache_bytes, to_cache_bytes, SerializationError};
pub use traits::{EventBus, KeyStore, SubscriberId, Subscription};

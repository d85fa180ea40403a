use std::{env, str::FromStr, time::Duration};

/// How filtered job listings interact with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingCachePolicy {
    /// Cache every distinct filter under its own `jobs:filter:` key.
    #[default]
    PerFilter,
    /// Only the unfiltered listing is cached; filtered queries go to the store.
    DefaultOnly,
}

impl FromStr for ListingCachePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-filter" | "per_filter" => Ok(Self::PerFilter),
            "default-only" | "default_only" => Ok(Self::DefaultOnly),
            other => Err(format!("unknown listing cache policy: {other}")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Job cache TTL in seconds (default: 600)
    pub cache_ttl_seconds: u64,
    /// Application cache TTL in seconds (default: 300)
    pub applications_cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Filtered listing policy (default: per-filter)
    pub listing_cache_policy: ListingCachePolicy,
    /// Per-subscriber event buffer (default: 256)
    pub event_channel_capacity: usize,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Job cache TTL in seconds (default: 600)
    /// - `APPLICATIONS_CACHE_TTL_SECONDS` - Application cache TTL (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `LISTING_CACHE_POLICY` - `per-filter` or `default-only` (default: per-filter)
    /// - `EVENT_CHANNEL_CAPACITY` - Per-subscriber event buffer (default: 256)
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset or
    /// unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            cache_ttl_seconds: parse_var(&lookup, "CACHE_TTL_SECONDS").unwrap_or(600),
            applications_cache_ttl_seconds: parse_var(&lookup, "APPLICATIONS_CACHE_TTL_SECONDS")
                .unwrap_or(300),
            cache_max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(10_000),
            listing_cache_policy: parse_var(&lookup, "LISTING_CACHE_POLICY").unwrap_or_default(),
            event_channel_capacity: parse_var(&lookup, "EVENT_CHANNEL_CAPACITY")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(256),
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
        }
    }

    /// Job cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Application cache TTL as a Duration.
    pub fn applications_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.applications_cache_ttl_seconds)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

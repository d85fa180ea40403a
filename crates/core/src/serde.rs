//! Serde helper functions for query-string deserialization.
//!
//! Query strings from HTML forms and hand-built URLs send empty values
//! (`?keyword=&minSalary=`) for unset filters; these helpers treat them as
//! `None` instead of failing or matching on an empty string.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Deserialize an optional value parsed with `FromStr`, treating empty strings as None.
pub fn deserialize_optional_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

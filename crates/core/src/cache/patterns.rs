//! Pure helpers for prefix-scoped key deletion.
//!
//! Backends that speak a glob dialect (Redis `SCAN MATCH`) need the literal
//! prefix escaped before a trailing `*` is appended; in-memory backends just
//! compare prefixes.

/// Characters that carry meaning in Redis glob patterns.
const GLOB_SPECIAL: [char; 5] = ['*', '?', '[', ']', '\\'];

/// Escapes glob metacharacters so the input only matches itself.
///
/// # Examples
///
/// ```
/// use jobboard_core::cache::escape_glob;
///
/// assert_eq!(escape_glob("jobs:filter:"), "jobs:filter:");
/// assert_eq!(escape_glob("a*b"), "a\\*b");
/// ```
pub fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if GLOB_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the glob pattern matching every key that starts with `prefix`.
///
/// # Examples
///
/// ```
/// use jobboard_core::cache::prefix_scan_pattern;
///
/// assert_eq!(prefix_scan_pattern("applications:user:"), "applications:user:*");
/// ```
pub fn prefix_scan_pattern(prefix: &str) -> String {
    format!("{}*", escape_glob(prefix))
}

/// Returns true if `key` falls under `prefix`.
///
/// An empty prefix matches nothing; deleting the whole keyspace is never
/// what an invalidation set means.
pub fn key_has_prefix(prefix: &str, key: &str) -> bool {
    !prefix.is_empty() && key.starts_with(prefix)
}

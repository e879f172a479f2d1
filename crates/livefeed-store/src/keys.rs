//! Store key builders for all LiveFeed cache entries.
//!
//! Centralising key construction prevents typos and makes it easy to
//! find every key the library uses.

/// Prefix applied to all LiveFeed store keys.
const PREFIX: &str = "livefeed";

/// Store key for the persisted snapshot of a scope.
pub fn snapshot(scope_key: &str) -> String {
    format!("{PREFIX}:snapshot:{scope_key}")
}

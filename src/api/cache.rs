//
//  bitbucket-v1
//  api/cache.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! In-memory response cache.
//!
//! GET responses are stored as raw bodies keyed by request path. Writes
//! through a controller drop every entry under that controller's path, so
//! invalidating `/repositories/o/r/issues/1/comments` also drops
//! `/repositories/o/r/issues/1/comments/7`.
//!
//! Entries never expire on their own.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Thread-safe map of request path to raw response body.
///
/// # Example
///
/// ```rust
/// use bitbucket_v1::api::cache::ResponseCache;
///
/// let cache = ResponseCache::new(true);
/// cache.insert("/users/jdoe", "{}".to_string());
/// assert_eq!(cache.get("/users/jdoe").as_deref(), Some("{}"));
///
/// cache.invalidate_prefix("/users");
/// assert!(cache.get("/users/jdoe").is_none());
/// ```
#[derive(Debug, Default)]
pub struct ResponseCache {
    enabled: bool,
    entries: Mutex<HashMap<String, String>>,
}

impl ResponseCache {
    /// Creates a cache. A disabled cache stores nothing.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Whether this cache stores responses at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the cached body for `path`, if any.
    pub fn get(&self, path: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.lock().get(path).cloned()
    }

    /// Stores `body` under `path`, replacing any previous entry.
    pub fn insert(&self, path: &str, body: String) {
        if !self.enabled {
            return;
        }
        self.lock().insert(path.to_string(), body);
    }

    /// Drops the entry for exactly `path`.
    pub fn remove(&self, path: &str) -> bool {
        self.lock().remove(path).is_some()
    }

    /// Drops every entry whose path starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    /// Drops the entry for `path` and every entry below it (`path/...`),
    /// leaving siblings such as `path0` alone.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_path(&self, path: &str) -> usize {
        let base = path.trim_end_matches('/');
        let children = format!("{}/", base);
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| key != base && !key.starts_with(&children));
        before - entries.len()
    }

    /// Drops everything.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned lock only means another thread panicked mid-insert; the map
    // itself is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = ResponseCache::new(false);
        cache.insert("/a", "body".to_string());
        assert!(cache.get("/a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let cache = ResponseCache::new(true);
        cache.insert("/a", "one".to_string());
        cache.insert("/a", "two".to_string());
        assert_eq!(cache.get("/a").as_deref(), Some("two"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_prefix_drops_children_only() {
        let cache = ResponseCache::new(true);
        let comments = "/repositories/o/r/issues/1/comments";
        cache.insert(comments, "[]".to_string());
        cache.insert(&format!("{}/7", comments), "{}".to_string());
        cache.insert("/repositories/o/r/issues/2/comments", "[]".to_string());

        assert_eq!(cache.invalidate_prefix(comments), 2);
        assert!(cache.get(comments).is_none());
        assert!(cache.get("/repositories/o/r/issues/2/comments").is_some());
    }

    #[test]
    fn test_invalidate_path_keeps_siblings() {
        let cache = ResponseCache::new(true);
        cache.insert("/repositories/o/r/issues/1", "{}".to_string());
        cache.insert("/repositories/o/r/issues/1/comments", "[]".to_string());
        cache.insert("/repositories/o/r/issues/10", "{}".to_string());
        cache.insert("/repositories/o/r/issues/100/followers", "{}".to_string());

        assert_eq!(cache.invalidate_path("/repositories/o/r/issues/1"), 2);
        assert!(cache.get("/repositories/o/r/issues/10").is_some());
        assert!(cache.get("/repositories/o/r/issues/100/followers").is_some());
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = ResponseCache::new(true);
        cache.insert("/a", "1".to_string());
        cache.insert("/b", "2".to_string());
        assert!(cache.remove("/a"));
        assert!(!cache.remove("/a"));
        cache.clear();
        assert!(cache.is_empty());
    }
}

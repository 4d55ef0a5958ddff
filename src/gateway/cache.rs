//! Short-lived cache of backend GET responses.
//!
//! Entries are keyed by bearer token and request path so one user never sees
//! another user's payload. Mutations drop every entry under the resource
//! prefixes they touch, for all tokens, so the next read goes to the backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    token: String,
    path: String,
}

#[derive(Clone, Debug)]
struct CacheEntry {
    stored_at: Instant,
    body: String,
}

#[derive(Debug)]
pub struct QueryCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl QueryCache {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, token: &str, path: &str) -> Option<String> {
        self.get_at(token, path, Instant::now())
    }

    fn get_at(&self, token: &str, path: &str, now: Instant) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        let key = CacheKey {
            token: token.to_string(),
            path: path.to_string(),
        };
        let mut entries = self.entries();
        match entries.get(&key) {
            Some(entry) if now.duration_since(entry.stored_at) < self.ttl => {
                Some(entry.body.clone())
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, token: &str, path: &str, body: String) {
        self.put_at(token, path, body, Instant::now());
    }

    /// Stores `body` and drops every expired entry, so keys of past tokens
    /// and dates do not outlive the ttl.
    fn put_at(&self, token: &str, path: &str, body: String, now: Instant) {
        if !self.is_enabled() {
            return;
        }
        let key = CacheKey {
            token: token.to_string(),
            path: path.to_string(),
        };
        let mut entries = self.entries();
        entries.retain(|_, entry| now.duration_since(entry.stored_at) < self.ttl);
        entries.insert(
            key,
            CacheEntry {
                stored_at: now,
                body,
            },
        );
    }

    /// Removes every entry whose path starts with one of `prefixes`.
    /// Returns the number of entries dropped.
    pub fn invalidate(&self, prefixes: &[&str]) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !prefixes.iter().any(|prefix| key.path.starts_with(prefix)));
        let removed = before - entries.len();
        if removed > 0 {
            log::debug!("Invalidated {removed} cached responses under {prefixes:?}");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub const VERSION_TTL: Duration = Duration::from_secs(60 * 60);
pub const ROSTER_TTL: Duration = Duration::from_secs(60 * 60);
pub const LIVE_MATCH_TTL: Duration = Duration::from_secs(60);
pub const ABILITIES_TTL: Duration = Duration::from_secs(60 * 60);
pub const SKILL_ORDER_TTL: Duration = Duration::from_secs(60 * 60);
pub const VIDEO_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub inserted_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match now.signed_duration_since(self.inserted_at).to_std() {
            Ok(elapsed) => elapsed <= ttl,
            // Inserted "in the future" (clock went backwards): still fresh
            Err(_) => true,
        }
    }
}

/// In-memory key/value store with per-read TTL.
///
/// Expired entries are only removed when they are read; there is no
/// background sweep and no size bound.
pub struct CacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        CacheStore {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Current time on the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let entry = entries.get(key)?;
        if !entry.is_fresh(now, ttl) {
            entries.remove(key);
            tracing::debug!(key, "cache entry expired");
            return None;
        }

        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => {
                tracing::debug!(key, "cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "dropping cache entry with unexpected shape");
                entries.remove(key);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                let entry = CacheEntry {
                    value,
                    inserted_at: self.clock.now(),
                };
                self.lock().insert(key.to_string(), entry);
            }
            Err(e) => tracing::warn!(key, error = %e, "failed to serialize value for cache"),
        }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deterministic key: operation name plus its JSON-encoded arguments.
pub fn cache_key<A: Serialize + ?Sized>(operation: &str, args: &A) -> String {
    let encoded = serde_json::to_string(args).unwrap_or_default();
    format!("{}:{}", operation, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;

    fn store() -> (Arc<ManualClock>, CacheStore) {
        let clock = Arc::new(ManualClock::new());
        let store = CacheStore::with_clock(clock.clone());
        (clock, store)
    }

    #[test]
    fn returns_value_within_ttl() {
        let (clock, store) = store();
        store.set("k", &vec![1, 2, 3]);
        clock.advance(chrono::Duration::seconds(59));

        let value: Option<Vec<i32>> = store.get("k", Duration::from_secs(60));
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[test]
    fn entry_at_exact_ttl_is_still_valid() {
        let (clock, store) = store();
        store.set("k", &"v");
        clock.advance(chrono::Duration::seconds(60));

        assert_eq!(store.get::<String>("k", Duration::from_secs(60)).as_deref(), Some("v"));
    }

    #[test]
    fn expired_entry_is_evicted_on_read() {
        let (clock, store) = store();
        store.set("k", &"v");
        clock.advance(chrono::Duration::seconds(61));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get::<String>("k", Duration::from_secs(60)), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn ttl_is_chosen_by_the_reader() {
        let (clock, store) = store();
        store.set("k", &42u32);
        clock.advance(chrono::Duration::minutes(5));

        assert_eq!(store.get::<u32>("k", VIDEO_TTL), Some(42));
        assert_eq!(store.get::<u32>("k", LIVE_MATCH_TTL), None);
    }

    #[test]
    fn wrong_shape_is_treated_as_absent() {
        let (_clock, store) = store();
        store.set("k", &"not a number");

        assert_eq!(store.get::<u32>("k", VERSION_TTL), None);
        assert!(store.is_empty());
    }

    #[test]
    fn identical_arguments_produce_identical_keys() {
        let a = cache_key("video_search", &("garen guide", 5));
        let b = cache_key("video_search", &("garen guide", 5));
        let c = cache_key("video_search", &("garen guide", 6));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("video_search:"));
    }
}

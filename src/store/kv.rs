//! Key/value store and clock collaborators
//!
//! The engine is agnostic to the backing store: anything with `get`/`set`
//! (with TTL) and `delete` over bytes works. `MemoryStore` is the embedded
//! default used by tests; production deployments plug in their own backend.
//! A `Clock` seam keeps expiry deterministic under test.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::Result;

/// Logical key/value contract required by the document store
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch a value; `None` means absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value, optionally with a time-to-live
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Remove a value; returns whether a value was present
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// Wall-clock source for timestamping and expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System clock backed by `chrono::Utc`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct StoredEntry {
    value: Vec<u8>,
    expires_at: Option<DateTime<Utc>>,
}

/// In-memory key/value store with TTL support
///
/// Expired entries are invisible to `get` immediately; the backing slot is
/// reclaimed by [`MemoryStore::sweep_expired`], intended to be invoked by an
/// external scheduler.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoredEntry>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create a store over the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store over an explicit clock (tests)
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Drop entries whose TTL has elapsed; returns how many were removed
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| match entry.expires_at {
            Some(expires_at) => expires_at > now,
            None => true,
        });
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "swept expired cache entries");
        }
        removed
    }

    /// Number of live (unexpired) entries
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries
            .values()
            .filter(|e| e.expires_at.map_or(true, |exp| exp > now))
            .count()
    }

    /// Whether the store holds no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        Ok(entries.get(key).and_then(|entry| {
            match entry.expires_at {
                Some(expires_at) if expires_at <= now => None,
                _ => Some(entry.value.clone()),
            }
        }))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let expires_at = match ttl {
            Some(ttl) => Some(
                self.clock.now()
                    + chrono::Duration::from_std(ttl)
                        .unwrap_or_else(|_| chrono::Duration::seconds(0)),
            ),
            None => None,
        };
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(key).is_some())
    }
}

#[cfg(test)]
pub(crate) mod test_clock {
    use super::*;
    use parking_lot::Mutex;

    /// Manually advanced clock for expiry tests
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(start),
            }
        }

        pub fn advance(&self, by: chrono::Duration) {
            let mut now = self.now.lock();
            *now = *now + by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_clock::ManualClock;
    use super::*;

    #[tokio::test]
    async fn set_get_delete_round_trip() {
        let store = MemoryStore::new();
        store.set("k", b"value".to_vec(), None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"value".to_vec()));
        assert!(store.delete("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(!store.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn expired_entries_are_invisible_then_swept() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = MemoryStore::with_clock(clock.clone());

        store
            .set("k", b"v".to_vec(), Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert!(store.get("k").await.unwrap().is_some());

        clock.advance(chrono::Duration::seconds(61));
        assert!(store.get("k").await.unwrap().is_none());
        assert_eq!(store.sweep_expired().await, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn entries_without_ttl_never_expire() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = MemoryStore::with_clock(clock.clone());

        store.set("k", b"v".to_vec(), None).await.unwrap();
        clock.advance(chrono::Duration::days(365));
        assert!(store.get("k").await.unwrap().is_some());
        assert_eq!(store.sweep_expired().await, 0);
    }
}

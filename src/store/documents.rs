//! Document store façade
//!
//! Mediates all caching for the engine: paginated page sets, extracted
//! structures, a bounded cache of bionic-transformed pages, and per-user
//! progress and bookmarks. Computation happens at most once per cache
//! lifetime: concurrent first accesses for the same document coalesce on a
//! per-key lock, CPU-bound work runs under `spawn_blocking`, and results are
//! published atomically with a single `set` so readers never observe a
//! partial page set.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::Mutex as SyncMutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use super::kv::{Clock, KvStore};
use super::progress::{Bookmark, ProgressEntry, ProgressMap};
use crate::config::Config;
use crate::error::Result;

/// Compute a content-addressed document id from raw bytes and basename
pub fn doc_id(raw_bytes: &[u8], basename: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_bytes);
    format!("{}_{}", basename, hex::encode(hasher.finalize()))
}

/// Cached page set for one document
///
/// Written atomically in one pagination pass; `total_pages` always equals
/// `pages.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSet {
    /// Page payloads in document order
    pub pages: Vec<String>,
    /// Page count, kept alongside for consumers of the raw artifact
    pub total_pages: usize,
    /// Computation timestamp; expiry is measured from here
    pub created_at: DateTime<Utc>,
}

/// A clamped window over a document's pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    /// Pages in the window, document order
    pub pages: Vec<String>,
    /// 1-based index of the first returned page
    pub current_page: usize,
    /// Total pages in the document
    pub total_pages: usize,
    /// Whether pages remain after this window
    pub has_more: bool,
}

impl PageSet {
    /// A clamped window over this page set
    ///
    /// `start_page` is 0-based; the returned `current_page` is 1-based.
    pub fn window(&self, start_page: usize, max_pages: usize) -> PageWindow {
        if self.total_pages == 0 {
            return PageWindow {
                pages: Vec::new(),
                current_page: 0,
                total_pages: 0,
                has_more: false,
            };
        }
        let start = start_page.min(self.total_pages - 1);
        let end = (start + max_pages).min(self.total_pages);
        PageWindow {
            pages: self.pages[start..end].to_vec(),
            current_page: start + 1,
            total_pages: self.total_pages,
            has_more: end < self.total_pages,
        }
    }
}

/// Key for a bionic-transformed page
type TransformedKey = (String, usize);

/// Document store façade over a key/value backend
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<DocumentStoreInner>,
}

struct DocumentStoreInner {
    kv: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    /// TTL for cached page sets and structures
    ttl: Duration,
    /// Retention window for progress rows
    retention: chrono::Duration,
    /// Per-key locks coalescing concurrent first accesses
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Bounded cache of bionic-transformed pages
    transformed: SyncMutex<LruCache<TransformedKey, String>>,
}

impl DocumentStore {
    /// Create a store over the given backend and clock
    pub fn new(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        let capacity = NonZeroUsize::new(config.cache.transformed_capacity)
            .unwrap_or_else(|| NonZeroUsize::new(500).unwrap());
        Self {
            inner: Arc::new(DocumentStoreInner {
                kv,
                clock,
                ttl: config.cache.ttl,
                retention: chrono::Duration::days(config.progress.retention_days),
                inflight: Mutex::new(HashMap::new()),
                transformed: SyncMutex::new(LruCache::new(capacity)),
            }),
        }
    }

    /// The store's clock (shared with timestamping callers)
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    // ========================================================================
    // Pages
    // ========================================================================

    /// Fetch the cached page set, or compute and publish it
    ///
    /// `compute` runs on the blocking pool. Concurrent first accesses for
    /// the same document coalesce: exactly one caller computes, the rest
    /// read its published result.
    pub async fn pages<F>(&self, doc_id: &str, compute: F) -> Result<PageSet>
    where
        F: FnOnce() -> Vec<String> + Send + 'static,
    {
        let key = page_key(doc_id);

        if let Some(cached) = self.load_pages(&key).await? {
            return Ok(cached);
        }

        let guard = self.acquire_inflight(&key).await;
        let _held = guard.lock().await;

        // Another coalesced caller may have published while we waited
        if let Some(cached) = self.load_pages(&key).await? {
            self.release_inflight(&key).await;
            return Ok(cached);
        }

        tracing::debug!(doc_id, "page cache miss, paginating");
        let pages = tokio::task::spawn_blocking(compute).await?;
        let set = PageSet {
            total_pages: pages.len(),
            pages,
            created_at: self.inner.clock.now(),
        };

        let bytes = serde_json::to_vec(&set)?;
        self.inner.kv.set(&key, bytes, Some(self.inner.ttl)).await?;
        self.release_inflight(&key).await;

        tracing::info!(doc_id, total_pages = set.total_pages, "published page set");
        Ok(set)
    }

    /// A clamped window over cached pages; `None` when nothing is cached
    ///
    /// `start_page` is 0-based; the returned `current_page` is 1-based.
    pub async fn page_window(
        &self,
        doc_id: &str,
        start_page: usize,
        max_pages: usize,
    ) -> Result<Option<PageWindow>> {
        let Some(set) = self.load_pages(&page_key(doc_id)).await? else {
            return Ok(None);
        };
        Ok(Some(set.window(start_page, max_pages)))
    }

    async fn load_pages(&self, key: &str) -> Result<Option<PageSet>> {
        let Some(set) = self.load::<PageSet>(key).await? else {
            return Ok(None);
        };
        // Lazy expiry guard for backends that ignore TTL
        if self.inner.clock.now() - set.created_at
            > chrono::Duration::from_std(self.inner.ttl).unwrap_or(chrono::Duration::MAX)
        {
            return Ok(None);
        }
        Ok(Some(set))
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Fetch the cached structure artifact, or compute and publish it
    ///
    /// Generic over the artifact type so callers own the structure shape;
    /// the same coalescing and atomic-publish rules as [`Self::pages`] apply.
    pub async fn structure<T, F>(&self, doc_id: &str, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let key = structure_key(doc_id);

        if let Some(cached) = self.load::<T>(&key).await? {
            return Ok(cached);
        }

        let guard = self.acquire_inflight(&key).await;
        let _held = guard.lock().await;

        if let Some(cached) = self.load::<T>(&key).await? {
            self.release_inflight(&key).await;
            return Ok(cached);
        }

        tracing::debug!(doc_id, "structure cache miss, extracting");
        let value = tokio::task::spawn_blocking(compute).await?;
        let bytes = serde_json::to_vec(&value)?;
        self.inner.kv.set(&key, bytes, Some(self.inner.ttl)).await?;
        self.release_inflight(&key).await;

        Ok(value)
    }

    // ========================================================================
    // Transformed pages
    // ========================================================================

    /// Cached bionic transformation of one page, if present
    pub fn transformed_page(&self, doc_id: &str, page_index: usize) -> Option<String> {
        let mut cache = self.inner.transformed.lock();
        cache.get(&(doc_id.to_string(), page_index)).cloned()
    }

    /// Cache the bionic transformation of one page
    pub fn store_transformed(&self, doc_id: &str, page_index: usize, transformed: String) {
        let mut cache = self.inner.transformed.lock();
        cache.put((doc_id.to_string(), page_index), transformed);
    }

    // ========================================================================
    // Progress
    // ========================================================================

    /// Record the last page read; last write wins per `(doc, user)`
    ///
    /// Expired rows for the user are pruned on write.
    pub async fn save_progress(&self, doc_id: &str, user_id: &str, page: u32) -> Result<()> {
        let key = progress_key(user_id);
        let now = self.inner.clock.now();

        let mut map = self.load::<ProgressMap>(&key).await?.unwrap_or_default();
        map.insert(
            doc_id.to_string(),
            ProgressEntry {
                page,
                updated_at: now,
            },
        );
        map.retain(|_, entry| now - entry.updated_at <= self.inner.retention);

        let bytes = serde_json::to_vec(&map)?;
        self.inner.kv.set(&key, bytes, None).await?;
        tracing::debug!(doc_id, user_id, page, "saved reading progress");
        Ok(())
    }

    /// Most recent page for `(doc, user)`, or `None` when absent or expired
    pub async fn progress(&self, doc_id: &str, user_id: &str) -> Result<Option<u32>> {
        let Some(map) = self.load::<ProgressMap>(&progress_key(user_id)).await? else {
            return Ok(None);
        };
        let now = self.inner.clock.now();
        Ok(map
            .get(doc_id)
            .filter(|entry| now - entry.updated_at <= self.inner.retention)
            .map(|entry| entry.page))
    }

    // ========================================================================
    // Bookmarks
    // ========================================================================

    /// Append a bookmark; duplicates by position are permitted
    pub async fn add_bookmark(
        &self,
        doc_id: &str,
        user_id: &str,
        position: u64,
    ) -> Result<Bookmark> {
        let key = bookmark_key(user_id, doc_id);
        let mut list = self.load::<Vec<Bookmark>>(&key).await?.unwrap_or_default();

        let bookmark = Bookmark {
            id: uuid::Uuid::new_v4(),
            position,
            created_at: self.inner.clock.now(),
        };
        list.push(bookmark.clone());

        let bytes = serde_json::to_vec(&list)?;
        self.inner.kv.set(&key, bytes, None).await?;
        Ok(bookmark)
    }

    /// All bookmarks for `(doc, user)` in insertion order
    pub async fn bookmarks(&self, doc_id: &str, user_id: &str) -> Result<Vec<Bookmark>> {
        Ok(self
            .load::<Vec<Bookmark>>(&bookmark_key(user_id, doc_id))
            .await?
            .unwrap_or_default())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.inner.kv.get(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn acquire_inflight(&self, key: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.inflight.lock().await;
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn release_inflight(&self, key: &str) {
        let mut map = self.inner.inflight.lock().await;
        map.remove(key);
    }
}

fn page_key(doc_id: &str) -> String {
    format!("pages:{doc_id}")
}

fn structure_key(doc_id: &str) -> String {
    format!("structure:{doc_id}")
}

fn progress_key(user_id: &str) -> String {
    format!("progress:{user_id}")
}

fn bookmark_key(user_id: &str, doc_id: &str) -> String {
    format!("bookmarks:{user_id}:{doc_id}")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::store::kv::test_clock::ManualClock;
    use crate::store::kv::MemoryStore;

    fn test_store() -> (DocumentStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let kv = Arc::new(MemoryStore::with_clock(clock.clone()));
        let store = DocumentStore::new(kv, clock.clone(), &Config::default());
        (store, clock)
    }

    #[test]
    fn doc_ids_are_content_addressed() {
        let a = doc_id(b"same bytes", "book.txt");
        let b = doc_id(b"same bytes", "book.txt");
        let c = doc_id(b"other bytes", "book.txt");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("book.txt_"));
    }

    #[tokio::test]
    async fn pages_compute_once_then_hit_cache() {
        let (store, _clock) = test_store();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            let set = store
                .pages("doc-1", move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    vec!["page one".to_string(), "page two".to_string()]
                })
                .await
                .unwrap();
            assert_eq!(set.total_pages, 2);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_first_accesses_coalesce() {
        let (store, _clock) = test_store();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                store
                    .pages("doc-rush", move || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Deterministic content regardless of which task wins
                        vec!["only page".to_string()]
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            let set = handle.await.unwrap();
            assert_eq!(set.pages, vec!["only page".to_string()]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_page_set_recomputes() {
        let (store, clock) = test_store();

        store
            .pages("doc-exp", || vec!["v1".to_string()])
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(3601));

        let set = store
            .pages("doc-exp", || vec!["v2".to_string()])
            .await
            .unwrap();
        assert_eq!(set.pages, vec!["v2".to_string()]);
    }

    #[tokio::test]
    async fn page_window_clamps_and_reports_more() {
        let (store, _clock) = test_store();
        let pages: Vec<String> = (1..=5).map(|i| format!("p{i}")).collect();
        store.pages("doc-w", move || pages).await.unwrap();

        let window = store.page_window("doc-w", 0, 2).await.unwrap().unwrap();
        assert_eq!(window.pages, vec!["p1", "p2"]);
        assert_eq!(window.current_page, 1);
        assert!(window.has_more);

        let window = store.page_window("doc-w", 3, 10).await.unwrap().unwrap();
        assert_eq!(window.pages, vec!["p4", "p5"]);
        assert_eq!(window.current_page, 4);
        assert!(!window.has_more);

        // Start past the end clamps to the last page
        let window = store.page_window("doc-w", 99, 2).await.unwrap().unwrap();
        assert_eq!(window.pages, vec!["p5"]);
        assert_eq!(window.current_page, 5);
    }

    #[tokio::test]
    async fn page_window_absent_document() {
        let (store, _clock) = test_store();
        assert!(store.page_window("ghost", 0, 5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn progress_is_last_write_wins() {
        let (store, _clock) = test_store();
        store.save_progress("doc-p", "alice", 3).await.unwrap();
        store.save_progress("doc-p", "alice", 7).await.unwrap();
        assert_eq!(store.progress("doc-p", "alice").await.unwrap(), Some(7));
        assert_eq!(store.progress("doc-p", "bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn progress_expires_after_retention_window() {
        let (store, clock) = test_store();
        store.save_progress("doc-p", "alice", 5).await.unwrap();

        clock.advance(chrono::Duration::days(31));
        assert_eq!(store.progress("doc-p", "alice").await.unwrap(), None);
    }

    #[tokio::test]
    async fn stale_progress_rows_pruned_on_write() {
        let (store, clock) = test_store();
        store.save_progress("doc-old", "alice", 1).await.unwrap();

        clock.advance(chrono::Duration::days(31));
        store.save_progress("doc-new", "alice", 2).await.unwrap();

        assert_eq!(store.progress("doc-old", "alice").await.unwrap(), None);
        assert_eq!(store.progress("doc-new", "alice").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn bookmarks_append_and_allow_duplicates() {
        let (store, _clock) = test_store();
        store.add_bookmark("doc-b", "alice", 100).await.unwrap();
        store.add_bookmark("doc-b", "alice", 100).await.unwrap();
        store.add_bookmark("doc-b", "alice", 250).await.unwrap();

        let list = store.bookmarks("doc-b", "alice").await.unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].position, 100);
        assert_eq!(list[2].position, 250);
        assert!(store.bookmarks("doc-b", "bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn transformed_page_cache_round_trip() {
        let (store, _clock) = test_store();
        assert!(store.transformed_page("doc-t", 0).is_none());
        store.store_transformed("doc-t", 0, "<b>bo</b>ld".to_string());
        assert_eq!(
            store.transformed_page("doc-t", 0).as_deref(),
            Some("<b>bo</b>ld")
        );
    }
}

//! Reading service
//!
//! Wires the read path together: pagination on first access, windowed page
//! delivery, on-demand bionic transformation, and progress recording. All
//! caching goes through the [`DocumentStore`]; the service itself holds no
//! mutable state.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::pagination::Paginator;
use crate::store::{doc_id, DocumentStore, PageWindow};
use crate::structure::{extract, DocumentMetadata, DocumentStructure, FormatHint};
use crate::text::{transform, SentenceSplitter};

/// A document's identity and extracted text, ready for reading
#[derive(Debug, Clone)]
pub struct DocumentText {
    /// Content-addressed document id
    pub doc_id: String,
    /// Plain text from the upstream extractor
    pub text: String,
}

impl DocumentText {
    /// Build from the original file bytes and basename plus extracted text
    pub fn new(raw_bytes: &[u8], basename: &str, text: String) -> Self {
        Self {
            doc_id: doc_id(raw_bytes, basename),
            text,
        }
    }
}

/// A read request for one window of pages
#[derive(Debug, Clone)]
pub struct ReadRequest {
    /// Requested page (1-based); out-of-range values clamp
    pub page: usize,
    /// Apply the bionic transformation to returned pages
    pub bionic: bool,
    /// Record progress for this user when present
    pub user_id: Option<String>,
}

impl Default for ReadRequest {
    fn default() -> Self {
        Self {
            page: 1,
            bionic: false,
            user_id: None,
        }
    }
}

/// Read-path façade over the paginator, transformer, and store
#[derive(Clone)]
pub struct ReaderService {
    store: DocumentStore,
    paginator: Paginator,
    splitter: Arc<dyn SentenceSplitter>,
    max_pages_per_request: usize,
    progress_enabled: bool,
}

impl ReaderService {
    /// Create a service; fails fast on an invalid page budget
    pub fn new(
        store: DocumentStore,
        splitter: Arc<dyn SentenceSplitter>,
        config: &Config,
    ) -> Result<Self> {
        Ok(Self {
            store,
            paginator: Paginator::new(config.pagination.page_budget as i64)?,
            splitter,
            max_pages_per_request: config.pagination.max_pages_per_request,
            progress_enabled: config.progress.enabled,
        })
    }

    /// The backing store
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Read a window of pages starting at the requested page
    ///
    /// First access paginates and publishes the full page set; later reads
    /// hit the cache. With `bionic` set, each returned page is transformed
    /// on the blocking pool (memoized per `(doc, page)`). Progress is saved
    /// for the requesting user after a successful read.
    pub async fn read(&self, doc: &DocumentText, request: ReadRequest) -> Result<PageWindow> {
        let start_page = request.page.saturating_sub(1);

        let set = {
            let text = doc.text.clone();
            let paginator = self.paginator.clone();
            self.store
                .pages(&doc.doc_id, move || paginator.paginate(&text))
                .await?
        };

        let mut window = set.window(start_page, self.max_pages_per_request);

        if request.bionic {
            let first_index = window.current_page.saturating_sub(1);
            for (offset, page) in window.pages.iter_mut().enumerate() {
                let index = first_index + offset;
                *page = self.transform_page(&doc.doc_id, index, page).await?;
            }
        }

        if self.progress_enabled {
            if let Some(user_id) = &request.user_id {
                if window.total_pages > 0 {
                    self.store
                        .save_progress(&doc.doc_id, user_id, window.current_page as u32)
                        .await?;
                }
            }
        }

        Ok(window)
    }

    /// Extract (or fetch the cached) document structure
    pub async fn structure(
        &self,
        doc: &DocumentText,
        hint: &FormatHint,
        metadata: DocumentMetadata,
    ) -> Result<DocumentStructure> {
        let text = doc.text.clone();
        let hint = hint.clone();
        self.store
            .structure(&doc.doc_id, move || extract(&text, &hint, metadata))
            .await
    }

    /// Last recorded page for a user, if any
    pub async fn progress(&self, doc: &DocumentText, user_id: &str) -> Result<Option<u32>> {
        self.store.progress(&doc.doc_id, user_id).await
    }

    async fn transform_page(&self, doc_id: &str, index: usize, page: &str) -> Result<String> {
        if let Some(cached) = self.store.transformed_page(doc_id, index) {
            return Ok(cached);
        }

        let transformed = {
            let page = page.to_string();
            let splitter = self.splitter.clone();
            tokio::task::spawn_blocking(move || transform(&page, splitter.as_ref())).await?
        };

        self.store.store_transformed(doc_id, index, transformed.clone());
        Ok(transformed)
    }
}

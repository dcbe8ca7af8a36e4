//! End-to-end reading flow
//!
//! Exercises the full pipeline the way an embedding server would: build a
//! document id from file bytes, paginate on first read, fetch windows with
//! and without the bionic transformation, extract structure, and track
//! per-user progress and bookmarks.

use std::sync::Arc;

use lectern::structure::DocumentMetadata;
use lectern::text::RuleSentenceSplitter;
use lectern::{
    Config, DocumentStore, DocumentText, FormatHint, MemoryStore, ReadRequest, ReaderService,
    SystemClock,
};

fn make_service(page_budget: usize) -> ReaderService {
    let mut config = Config::default();
    config.pagination.page_budget = page_budget;
    let kv = Arc::new(MemoryStore::new());
    let store = DocumentStore::new(kv, Arc::new(SystemClock), &config);
    ReaderService::new(store, Arc::new(RuleSentenceSplitter), &config).unwrap()
}

fn sample_book() -> DocumentText {
    let text = "Chapter 1 Beginnings\n\
                The reader opened the book. Words began to flow.\n\
                Chapter 2 Middles\n\
                Extraordinary progress followed quickly.\n\
                Chapter 3 Endings\n\
                Everything wrapped up neatly."
        .to_string();
    DocumentText::new(b"sample book bytes", "sample.txt", text)
}

#[tokio::test]
async fn paginate_read_and_round_trip() {
    let service = make_service(60);
    let doc = sample_book();

    let window = service.read(&doc, ReadRequest::default()).await.unwrap();
    assert!(window.total_pages >= 2);
    assert_eq!(window.current_page, 1);

    // Gather every page and confirm no text was lost
    let mut all_pages = Vec::new();
    let mut page = 1;
    loop {
        let window = service
            .read(
                &doc,
                ReadRequest {
                    page,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let count = window.pages.len();
        all_pages.extend(window.pages);
        if !window.has_more {
            break;
        }
        page += count;
    }
    assert_eq!(all_pages.join("\n"), doc.text);
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let service = make_service(60);
    let doc = sample_book();

    let first = service.read(&doc, ReadRequest::default()).await.unwrap();
    let second = service.read(&doc, ReadRequest::default()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn bionic_read_emphasizes_long_words() {
    let service = make_service(3000);
    let doc = sample_book();

    let window = service
        .read(
            &doc,
            ReadRequest {
                bionic: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let body = window.pages.concat();
    // "Extraordinary" is 13 chars: floor(13 * 3 / 5) = 7 emphasized
    assert!(body.contains("<b>Extraor</b>dinary"));
    // Digits stay untouched
    assert!(!body.contains("<b>1</b>"));
}

#[tokio::test]
async fn structure_extraction_finds_chapters() {
    let service = make_service(3000);
    let doc = sample_book();

    let structure = service
        .structure(&doc, &FormatHint::Pattern, DocumentMetadata::default())
        .await
        .unwrap();

    let titles: Vec<_> = structure.toc.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Chapter 1 Beginnings", "Chapter 2 Middles", "Chapter 3 Endings"]
    );
    assert_eq!(structure.chapters.roots.len(), 3);
    assert_eq!(
        structure.chapters.dfs(),
        (0..structure.chapters.len()).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn progress_and_bookmarks_per_user() {
    let service = make_service(60);
    let doc = sample_book();

    service
        .read(
            &doc,
            ReadRequest {
                page: 2,
                user_id: Some("alice".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(service.progress(&doc, "alice").await.unwrap(), Some(2));

    let store = service.store();
    store.add_bookmark(&doc.doc_id, "alice", 42).await.unwrap();
    store.add_bookmark(&doc.doc_id, "alice", 42).await.unwrap();
    assert_eq!(store.bookmarks(&doc.doc_id, "alice").await.unwrap().len(), 2);
    assert!(store.bookmarks(&doc.doc_id, "bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn identical_bytes_share_one_cache_entry() {
    let service = make_service(60);
    let doc_a = DocumentText::new(b"same", "book.txt", "Hello there.".into());
    let doc_b = DocumentText::new(b"same", "book.txt", "Hello there.".into());
    assert_eq!(doc_a.doc_id, doc_b.doc_id);

    service.read(&doc_a, ReadRequest::default()).await.unwrap();
    // Second document hits the cache published by the first
    let window = service.read(&doc_b, ReadRequest::default()).await.unwrap();
    assert_eq!(window.pages, vec!["Hello there.".to_string()]);
}

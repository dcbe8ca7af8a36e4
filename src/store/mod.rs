//! Document store façade and its collaborator seams
//!
//! The store mediates every cached artifact the engine produces: page sets,
//! structures, transformed pages, and per-user progress and bookmarks. It
//! sits on a logical key/value contract and a clock, both injected, so the
//! backing technology is the embedder's choice.

mod documents;
mod kv;
mod progress;

pub use documents::{doc_id, DocumentStore, PageSet, PageWindow};
pub use kv::{Clock, KvStore, MemoryStore, SystemClock};
pub use progress::{Bookmark, ProgressEntry, ProgressMap};

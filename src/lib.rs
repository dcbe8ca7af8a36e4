//! Lectern
//!
//! A bionic reading engine. Ingests plain text extracted from arbitrary
//! document formats and produces boundary-respecting pagination, on-demand
//! per-word partial emphasis, and an inferred chapter/table-of-contents
//! structure, with a document-store façade mediating caching and per-user
//! reading state.
//!
//! # Modules
//!
//! - `pagination`: soft-budget pagination respecting paragraph/sentence boundaries
//! - `text`: lossless tokenization and the bionic transformation
//! - `structure`: format-hint-driven chapter tree extraction
//! - `store`: document store façade over a pluggable key/value backend
//! - `service`: read-path wiring (paginate, window, transform, record progress)
//! - `extract`: contracts for the external raw-text provider
//!
//! Format-specific binary extraction, HTTP transport, and persistence
//! backends are collaborator concerns supplied by the embedding application.

pub mod config;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod service;
pub mod store;
pub mod structure;
pub mod text;

pub use config::Config;
pub use error::{ReaderError, Result};
pub use pagination::Paginator;
pub use service::{DocumentText, ReadRequest, ReaderService};
pub use store::{doc_id, DocumentStore, MemoryStore, PageSet, PageWindow, SystemClock};
pub use structure::{DocumentStructure, FormatHint};

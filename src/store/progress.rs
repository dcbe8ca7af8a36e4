//! Progress and bookmark records
//!
//! Persisted artifact shapes for per-user reading state. Progress is one row
//! per `(doc, user)` pair with last-write-wins semantics and a retention
//! window measured from the write timestamp. Bookmarks are append-only;
//! duplicate positions are permitted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Last-read position for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    /// Last page read (1-based)
    pub page: u32,
    /// Write timestamp; expiry is measured from here
    pub updated_at: DateTime<Utc>,
}

/// A user's progress across documents, keyed by doc id
pub type ProgressMap = HashMap<String, ProgressEntry>;

/// A saved position within a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Bookmark id
    pub id: Uuid,
    /// Character or page position within the document
    pub position: u64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

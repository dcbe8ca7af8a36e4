//! Boundary-respecting pagination
//!
//! Splits a document's text into pages that respect paragraph and sentence
//! boundaries. The page budget is a soft cap measured in characters: a single
//! fragment larger than the budget becomes its own oversized page rather than
//! being truncated. No text is ever dropped.
//!
//! Pagination keeps a deliberately naive `". "` sentence boundary for
//! oversized paragraphs. It is distinct from the linguistic
//! `SentenceSplitter` seam used by the bionic transformer; the two boundary
//! definitions serve different purposes and are not reconciled.

use crate::error::{ReaderError, Result};

/// Splits text into pages under a soft character budget
#[derive(Debug, Clone)]
pub struct Paginator {
    page_budget: usize,
}

impl Paginator {
    /// Create a paginator with the given character budget per page
    ///
    /// A non-positive budget is a configuration error, surfaced immediately.
    pub fn new(page_budget: i64) -> Result<Self> {
        if page_budget <= 0 {
            return Err(ReaderError::BudgetConfiguration(page_budget));
        }
        Ok(Self {
            page_budget: page_budget as usize,
        })
    }

    /// The configured character budget
    pub fn page_budget(&self) -> usize {
        self.page_budget
    }

    /// Paginate text into ordered page strings
    ///
    /// Walks newline-delimited paragraphs, accumulating a buffer. A
    /// paragraph that fits the remaining budget is appended (paragraphs
    /// within a page stay newline-joined); one that does not starts a new
    /// page. A paragraph alone exceeding the budget is split at `". "`
    /// boundaries with the separator retained, so concatenating all pages
    /// loses no text. Empty input yields zero pages.
    pub fn paginate(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut pages = Vec::new();
        let mut buffer = String::new();
        let mut buffer_len = 0usize;

        for paragraph in text.split('\n') {
            let para_len = paragraph.chars().count();

            if para_len > self.page_budget {
                // Oversized paragraph: fill at sentence-fragment granularity
                let mut first_fragment = true;
                for fragment in paragraph.split_inclusive(". ") {
                    let frag_len = fragment.chars().count();
                    if buffer_len + frag_len > self.page_budget && !buffer.is_empty() {
                        pages.push(std::mem::take(&mut buffer));
                        buffer_len = 0;
                    }
                    // Paragraph separator when continuing a page started by
                    // earlier paragraphs; fragments of the same paragraph
                    // concatenate directly
                    if first_fragment && !buffer.is_empty() {
                        buffer.push('\n');
                        buffer_len += 1;
                    }
                    buffer.push_str(fragment);
                    buffer_len += frag_len;
                    first_fragment = false;
                }
            } else {
                if buffer_len + para_len > self.page_budget && !buffer.is_empty() {
                    pages.push(std::mem::take(&mut buffer));
                    buffer_len = 0;
                }
                if !buffer.is_empty() {
                    buffer.push('\n');
                    buffer_len += 1;
                }
                buffer.push_str(paragraph);
                buffer_len += para_len;
            }
        }

        if !buffer.is_empty() {
            pages.push(buffer);
        }

        pages
    }
}

//! Raw-text provider collaborator
//!
//! Format-specific extraction (turning a `.docx`/`.pdf`/`.epub` binary into
//! plain text plus style hints) lives outside the engine; this module only
//! defines the contract and the extension table the engine recognizes.
//! Providers must return text in original reading order; embedded `<p>`
//! wrappers are tolerated as paragraph delimiters downstream.

use async_trait::async_trait;

use crate::error::{ReaderError, Result};
use crate::structure::{DocumentMetadata, FormatHint};

/// Supported document formats, grouped by extraction family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Plain and delimited text: txt, csv, json, xml, html
    PlainText,
    /// Markup with explicit heading syntax: md
    Markdown,
    /// Word-processor documents with style names: doc, docx, odt, rtf
    WordProcessor,
    /// Spreadsheets: xls, xlsx, ods
    Spreadsheet,
    /// Slide decks: ppt, pptx, odp
    SlideDeck,
    /// Page-based documents with native outlines: pdf
    Paged,
    /// Ebooks: epub, mobi
    Ebook,
    /// Source code files
    Code,
}

impl DocumentFormat {
    /// Map a file extension (with or without leading dot) to a format
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        let format = match ext.as_str() {
            "txt" | "csv" | "json" | "xml" | "html" | "htm" => Self::PlainText,
            "md" => Self::Markdown,
            "doc" | "docx" | "odt" | "rtf" => Self::WordProcessor,
            "xls" | "xlsx" | "ods" => Self::Spreadsheet,
            "ppt" | "pptx" | "odp" => Self::SlideDeck,
            "pdf" => Self::Paged,
            "epub" | "mobi" => Self::Ebook,
            "py" | "js" | "java" | "cpp" | "c" | "h" | "cs" | "php" | "rs" => Self::Code,
            other => return Err(ReaderError::UnsupportedFormat(format!(".{other}"))),
        };
        Ok(format)
    }
}

/// What a provider hands the engine for one document
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Decoded plain text in reading order (may carry `<p>` wrappers)
    pub text: String,
    /// Structure-extraction hint for this format
    pub hint: FormatHint,
    /// Metadata passthrough
    pub metadata: DocumentMetadata,
}

/// Format-specific raw-text extraction, supplied by the embedding application
#[async_trait]
pub trait RawTextProvider: Send + Sync {
    /// Decode file bytes into plain text, hints, and metadata
    async fn extract_text(
        &self,
        file_bytes: &[u8],
        format: DocumentFormat,
    ) -> Result<ExtractedContent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_families() {
        assert_eq!(
            DocumentFormat::from_extension(".docx").unwrap(),
            DocumentFormat::WordProcessor
        );
        assert_eq!(
            DocumentFormat::from_extension("PDF").unwrap(),
            DocumentFormat::Paged
        );
        assert_eq!(
            DocumentFormat::from_extension("epub").unwrap(),
            DocumentFormat::Ebook
        );
        assert_eq!(
            DocumentFormat::from_extension(".md").unwrap(),
            DocumentFormat::Markdown
        );
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        assert!(matches!(
            DocumentFormat::from_extension(".exe"),
            Err(ReaderError::UnsupportedFormat(_))
        ));
    }
}

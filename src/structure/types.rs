//! Structure types
//!
//! Chapter trees are stored in an arena: nodes live in a flat `Vec` and
//! refer to parent and children by index, so nesting never creates ownership
//! cycles. Depth-first traversal of the arena equals document order.

use serde::{Deserialize, Serialize};

/// Format hint supplied by the upstream extractor, selected once per document
///
/// The variant decides which structure-extraction mode runs; richer hints
/// carry the data the mode needs.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatHint {
    /// Markup text with explicit heading syntax (`#` markers)
    HeadingMarkers,
    /// Word-processor paragraphs carrying style names ("Heading 1", "Normal")
    StyledParagraphs(Vec<StyledParagraph>),
    /// Plain text; headings recognized by common chapter/section prefixes
    Pattern,
    /// Native author-supplied outline, preferred for the table of contents
    Outline(Vec<OutlineEntry>),
    /// No structural cues; blank-line paragraphs become numbered parts
    None,
}

/// A paragraph with its style name, as delivered by word-processor extractors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledParagraph {
    /// Paragraph text
    pub text: String,
    /// Style name (e.g. "Heading 2", "Normal")
    pub style: String,
}

/// An entry in a native document outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineEntry {
    /// Entry title
    pub title: String,
    /// Target page, when the format provides one
    pub page: Option<u32>,
    /// Nested entries (depth determines level)
    pub children: Vec<OutlineEntry>,
}

/// Document metadata, passthrough from the upstream extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,
    /// Author/creator
    pub author: Option<String>,
    /// Creation timestamp (ISO 8601)
    pub created: Option<String>,
    /// Last-modified timestamp (ISO 8601)
    pub modified: Option<String>,
}

/// Flattened table-of-contents entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    /// Entry title
    pub title: String,
    /// Nesting level (1 = top)
    pub level: u32,
    /// Target page, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// A chapter emitted by a structure-extraction mode, before tree assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatChapter {
    /// Chapter title
    pub title: String,
    /// Nesting level hint (1 = top)
    pub level: u32,
    /// Raw text span belonging to this chapter
    pub content: String,
    /// Character offset of the chapter within the document
    pub start_position: usize,
}

/// A node in the chapter arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterNode {
    /// Chapter title
    pub title: String,
    /// Nesting level (1 = top)
    pub level: u32,
    /// Raw text span belonging to this chapter
    pub content: String,
    /// Character offset of the chapter within the document
    pub start_position: usize,
    /// Parent node index; `None` for roots
    pub parent: Option<usize>,
    /// Child node indices in document order
    pub children: Vec<usize>,
}

/// Chapter tree over arena-indexed nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterTree {
    /// All nodes in document (insertion) order
    pub nodes: Vec<ChapterNode>,
    /// Root node indices in document order
    pub roots: Vec<usize>,
}

impl ChapterTree {
    /// Number of chapters in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no chapters
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node lookup by arena index
    pub fn node(&self, index: usize) -> Option<&ChapterNode> {
        self.nodes.get(index)
    }

    /// Depth-first traversal yielding arena indices in document order
    pub fn dfs(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            order.push(index);
            if let Some(node) = self.nodes.get(index) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }
}

/// Extracted document structure: metadata, toc, and the chapter tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStructure {
    /// Metadata passthrough from the upstream extractor
    pub metadata: DocumentMetadata,
    /// Flattened navigation view
    pub toc: Vec<TocEntry>,
    /// Hierarchical chapter decomposition
    pub chapters: ChapterTree,
}

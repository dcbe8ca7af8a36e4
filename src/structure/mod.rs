//! Chapter structure extraction
//!
//! Infers a hierarchical chapter / table-of-contents structure from raw text
//! plus lightweight format hints. Extraction is polymorphic over the hint
//! set (heading markers, style names, patterns, native outlines, paragraph
//! fallback); every mode emits a flat level-annotated chapter list that a
//! stack-based builder assembles into an arena tree.

mod modes;
mod tree;
mod types;

pub use modes::extract;
pub use tree::build_tree;
pub use types::{
    ChapterNode, ChapterTree, DocumentMetadata, DocumentStructure, FlatChapter, FormatHint,
    OutlineEntry, StyledParagraph, TocEntry,
};

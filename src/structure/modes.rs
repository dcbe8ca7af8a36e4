//! Structure-extraction modes
//!
//! Each mode turns raw text (plus whatever hints its format supplies) into a
//! flat, level-annotated chapter list; `tree::build_tree` assembles the arena
//! tree afterwards. The mode is selected once per document by the
//! [`FormatHint`] variant. A malformed hint never fails the request: the
//! extractor logs a warning and falls back to pattern mode.

use std::sync::OnceLock;

use regex::Regex;

use super::tree::build_tree;
use super::types::{
    DocumentMetadata, DocumentStructure, FlatChapter, FormatHint, OutlineEntry, StyledParagraph,
    TocEntry,
};
use crate::error::{ReaderError, Result};

/// Title used for content preceding the first recognized heading
const FRONT_MATTER_TITLE: &str = "Front matter";

fn heading_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^(#{1,6})[ \t]+(.+)$").unwrap())
}

fn chapter_pattern_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(Chapter|Section|\d+\.)\s+\w+").unwrap())
}

/// Extract document structure using the mode selected by the hint
pub fn extract(text: &str, hint: &FormatHint, metadata: DocumentMetadata) -> DocumentStructure {
    let mut toc_override = None;

    let flat = match hint {
        FormatHint::HeadingMarkers => heading_chapters(text),
        FormatHint::StyledParagraphs(paragraphs) => match styled_chapters(paragraphs) {
            Ok(flat) => flat,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "style-name extraction failed, falling back to pattern mode"
                );
                pattern_chapters(text)
            }
        },
        FormatHint::Pattern => pattern_chapters(text),
        FormatHint::Outline(entries) => {
            // The native outline is authoritative for navigation; chapters
            // still come from a pattern pass over the page text
            let toc = walk_outline(entries);
            if !toc.is_empty() {
                toc_override = Some(toc);
            }
            pattern_chapters(text)
        }
        FormatHint::None => fallback_chapters(text),
    };

    let toc = toc_override.unwrap_or_else(|| {
        flat.iter()
            .map(|c| TocEntry {
                title: c.title.clone(),
                level: c.level,
                page: None,
            })
            .collect()
    });

    DocumentStructure {
        metadata,
        toc,
        chapters: build_tree(flat),
    }
}

/// Heading-marker mode: headings located by `#` markers, level = marker depth
///
/// Content between consecutive headings belongs to the preceding heading;
/// a non-empty preamble becomes an implicit front-matter chapter so chapter
/// spans still concatenate back to the document.
fn heading_chapters(text: &str) -> Vec<FlatChapter> {
    let mut chapters = Vec::new();
    let matches: Vec<_> = heading_marker_re().captures_iter(text).collect();

    if matches.is_empty() {
        return fallback_chapters(text);
    }

    let first_start = matches[0].get(0).unwrap().start();
    if !text[..first_start].trim().is_empty() {
        chapters.push(FlatChapter {
            title: FRONT_MATTER_TITLE.to_string(),
            level: 1,
            content: text[..first_start].to_string(),
            start_position: 0,
        });
    }

    for (i, caps) in matches.iter().enumerate() {
        let whole = caps.get(0).unwrap();
        let level = caps.get(1).unwrap().as_str().len() as u32;
        let title = caps.get(2).unwrap().as_str().trim().to_string();

        let content_start = whole.end();
        let content_end = matches
            .get(i + 1)
            .map(|next| next.get(0).unwrap().start())
            .unwrap_or(text.len());

        chapters.push(FlatChapter {
            title,
            level,
            content: text[content_start..content_end].to_string(),
            start_position: text[..whole.start()].chars().count(),
        });
    }

    chapters
}

/// Style-name mode: level parsed from the trailing digit of a "Heading N"
/// style name
///
/// A new heading closes the previous chapter; non-heading paragraphs append
/// to the open chapter or to an implicit front-matter chapter. A heading
/// style without a trailing digit is malformed input. Multi-digit levels are
/// a defined limitation: only the final digit is read.
fn styled_chapters(paragraphs: &[StyledParagraph]) -> Result<Vec<FlatChapter>> {
    let mut chapters: Vec<FlatChapter> = Vec::new();
    let mut position = 0usize;

    for para in paragraphs {
        if para.style.starts_with("Heading") {
            let level = para
                .style
                .chars()
                .last()
                .and_then(|c| c.to_digit(10))
                .ok_or_else(|| {
                    ReaderError::MalformedInput(format!(
                        "heading style without level digit: {:?}",
                        para.style
                    ))
                })?;

            chapters.push(FlatChapter {
                title: para.text.clone(),
                level,
                content: String::new(),
                start_position: position,
            });
        } else if let Some(open) = chapters.last_mut() {
            open.content.push_str(&para.text);
            open.content.push('\n');
        } else {
            chapters.push(FlatChapter {
                title: FRONT_MATTER_TITLE.to_string(),
                level: 1,
                content: format!("{}\n", para.text),
                start_position: position,
            });
        }
        position += para.text.chars().count() + 1;
    }

    Ok(chapters)
}

/// Pattern mode: a heading is a line matching a common chapter/section prefix
///
/// Lines before the first recognized heading form an implicit front-matter
/// chapter.
fn pattern_chapters(text: &str) -> Vec<FlatChapter> {
    let mut chapters: Vec<FlatChapter> = Vec::new();
    let mut position = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        if chapter_pattern_re().is_match(line) {
            chapters.push(FlatChapter {
                title: line.trim().to_string(),
                level: 1,
                content: String::new(),
                start_position: position,
            });
        } else if let Some(open) = chapters.last_mut() {
            open.content.push_str(line);
            open.content.push('\n');
        } else if !line.trim().is_empty() {
            chapters.push(FlatChapter {
                title: FRONT_MATTER_TITLE.to_string(),
                level: 1,
                content: format!("{line}\n"),
                start_position: position,
            });
        }
        position += line_len + 1;
    }

    chapters
}

/// Fallback mode: blank-line-delimited paragraphs become numbered parts
fn fallback_chapters(text: &str) -> Vec<FlatChapter> {
    let mut chapters = Vec::new();
    let mut position = 0usize;
    let mut part = 0usize;

    for block in text.split("\n\n") {
        let block_len = block.chars().count();
        if !block.trim().is_empty() {
            part += 1;
            chapters.push(FlatChapter {
                title: format!("Part {part}"),
                level: 1,
                content: block.trim().to_string(),
                start_position: position,
            });
        }
        position += block_len + 2;
    }

    chapters
}

/// Walk a native outline recursively; nesting depth becomes the level
fn walk_outline(entries: &[OutlineEntry]) -> Vec<TocEntry> {
    fn walk(entries: &[OutlineEntry], level: u32, out: &mut Vec<TocEntry>) {
        for entry in entries {
            out.push(TocEntry {
                title: entry.title.clone(),
                level,
                page: entry.page,
            });
            walk(&entry.children, level + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(entries, 1, &mut out);
    out
}

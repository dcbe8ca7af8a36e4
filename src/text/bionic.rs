//! Bionic partial-emphasis transformation
//!
//! Marks a prefix of each word as emphasized (`<b>…</b>`) to guide the eye.
//! The emphasis ratio grows with word length: single characters are left
//! alone, short words get one character, medium words half, long words 60%.
//! Numbers and pure punctuation are never emphasized. The transformation is
//! a pure function; identical input always yields identical output.

use super::sentence::SentenceSplitter;
use super::tokenizer::{tokenize, Token};

/// Compute the emphasis prefix length for a word of `n` characters
fn emphasis_len(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        2 | 3 => 1,
        4..=6 => n / 2,
        _ => n * 3 / 5,
    }
}

/// Apply the per-word emphasis rule
///
/// Hyphenated words are transformed part by part and rejoined with `-`.
/// Words containing a digit, and tokens with no alphanumeric character,
/// are returned unchanged. Lengths are measured in characters, not bytes.
pub fn transform_word(word: &str) -> String {
    if word.trim().is_empty() {
        return word.to_string();
    }

    // Hyphen check precedes the digit check: each part is judged on its own
    if word.contains('-') {
        return word
            .split('-')
            .map(transform_word)
            .collect::<Vec<_>>()
            .join("-");
    }

    if word.chars().any(|c| c.is_numeric()) {
        return word.to_string();
    }

    if word.chars().all(|c| !c.is_alphanumeric()) {
        return word.to_string();
    }

    let n = word.chars().count();
    let k = emphasis_len(n);
    if k == 0 {
        return word.to_string();
    }

    let split_at = word
        .char_indices()
        .nth(k)
        .map(|(i, _)| i)
        .unwrap_or(word.len());
    let (head, tail) = word.split_at(split_at);
    format!("<b>{head}</b>{tail}")
}

/// Transform a page of text into its bionic form
///
/// Upstream `<p>` wrappers are stripped first, the text is split into
/// sentences by the supplied splitter, each sentence is tokenized and
/// transformed word by word, and each processed sentence is re-wrapped in
/// `<p>…</p>` and joined with newlines.
pub fn transform(page_text: &str, splitter: &dyn SentenceSplitter) -> String {
    let text = page_text.replace("<p>", "").replace("</p>", "\n");

    let mut out = Vec::new();
    for sentence in splitter.split(&text) {
        let processed: String = tokenize(&sentence)
            .iter()
            .map(|token| match token {
                Token::Word(w) => transform_word(w),
                Token::Separator(c) => c.to_string(),
            })
            .collect();
        out.push(format!("<p>{processed}</p>"));
    }
    out.join("\n")
}

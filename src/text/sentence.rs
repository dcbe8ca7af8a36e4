//! Sentence splitting collaborator
//!
//! Linguistically aware sentence splitting is supplied by the embedding
//! application; the engine only depends on the trait. `RuleSentenceSplitter`
//! is a rule-based default good enough for tests and embedded use. Note that
//! pagination deliberately does not use this seam: it keeps its own naive
//! `". "` boundary (see `pagination`).

/// Sentence boundary detection supplied by the embedding application
pub trait SentenceSplitter: Send + Sync {
    /// Split text into sentences, preserving all characters across the
    /// returned parts
    fn split(&self, text: &str) -> Vec<String>;
}

/// Rule-based sentence splitter
///
/// Splits after `.`, `!` or `?` when followed by whitespace. Abbreviations
/// and decimal points will over-split; callers needing better boundaries
/// plug in their own implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSentenceSplitter;

impl SentenceSplitter for RuleSentenceSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            current.push(c);
            if matches!(c, '.' | '!' | '?') {
                // Consume trailing whitespace into the current sentence so
                // concatenation stays lossless
                while matches!(chars.peek(), Some(w) if w.is_whitespace()) {
                    current.push(chars.next().unwrap());
                }
                sentences.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            sentences.push(current);
        }
        sentences
    }
}

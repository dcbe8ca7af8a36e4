//! Text processing
//!
//! Lossless word/separator tokenization and the bionic partial-emphasis
//! transformation, plus the sentence-splitter collaborator seam. Everything
//! here is a pure function over in-memory text; no IO, no hidden state.

mod bionic;
mod sentence;
mod tokenizer;

pub use bionic::{transform, transform_word};
pub use sentence::{RuleSentenceSplitter, SentenceSplitter};
pub use tokenizer::{reassemble, tokenize, Token};

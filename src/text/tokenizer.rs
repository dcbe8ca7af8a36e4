//! Word/separator tokenizer
//!
//! Splits a sentence into word and separator tokens. Whitespace and the
//! punctuation set `.,!?;:` terminate the current word and are emitted as
//! standalone separator tokens, so concatenating all tokens reproduces the
//! input exactly.

/// A token produced by [`tokenize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of characters that is neither whitespace nor terminal punctuation
    Word(String),
    /// A single whitespace or punctuation character
    Separator(char),
}

/// Punctuation characters that terminate a word
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | ',' | '!' | '?' | ';' | ':')
}

/// Tokenize a sentence into word and separator tokens
pub fn tokenize(sentence: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in sentence.chars() {
        if is_separator(c) {
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word)));
            }
            tokens.push(Token::Separator(c));
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

/// Reassemble tokens into a string (exact inverse of [`tokenize`])
pub fn reassemble(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Word(w) => out.push_str(w),
            Token::Separator(c) => out.push(*c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_and_separators() {
        let tokens = tokenize("Hello, world!");
        assert_eq!(
            tokens,
            vec![
                Token::Word("Hello".into()),
                Token::Separator(','),
                Token::Separator(' '),
                Token::Word("world".into()),
                Token::Separator('!'),
            ]
        );
    }

    #[test]
    fn round_trips_exactly() {
        let inputs = [
            "Hello, world!",
            "  leading and   internal   runs ",
            "semi;colon:and.dots",
            "",
            "no-separators-here",
        ];
        for input in inputs {
            assert_eq!(reassemble(&tokenize(input)), input);
        }
    }

    #[test]
    fn hyphens_stay_inside_words() {
        let tokens = tokenize("well-known fact");
        assert_eq!(tokens[0], Token::Word("well-known".into()));
    }
}

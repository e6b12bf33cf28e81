#![forbid(unsafe_code)]

use std::collections::BTreeSet;

/// Characters removed by [`Tokenizer::new`]: the ASCII punctuation set.
pub const DEFAULT_PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Word tokenizer: strips punctuation, lowercases, splits on whitespace runs.
///
/// Punctuation is deleted rather than treated as a separator, so `"don't"`
/// becomes `"dont"`. Empty and all-punctuation inputs yield no tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tokenizer {
    punctuation: BTreeSet<char>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Tokenizer removing [`DEFAULT_PUNCTUATION`].
    pub fn new() -> Self {
        Self::with_punctuation(DEFAULT_PUNCTUATION.chars())
    }

    /// Tokenizer removing exactly the given characters.
    pub fn with_punctuation<I>(chars: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        Self {
            punctuation: chars.into_iter().collect(),
        }
    }

    /// Characters this tokenizer removes, in sorted order.
    pub fn punctuation(&self) -> impl Iterator<Item = char> + '_ {
        self.punctuation.iter().copied()
    }

    /// Split `text` into normalized tokens, preserving their order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let stripped: String = text
            .chars()
            .filter(|c| !self.punctuation.contains(c))
            .collect();
        stripped
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

/// Detokenize back into a string (join with spaces)
pub fn detokenize(tokens: &[String]) -> String {
    tokens.join(" ")
}

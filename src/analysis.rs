//! Text analysis for indexed text fields and query terms.
//!
//! Text is split on Unicode word boundaries (UAX #29), punctuation and
//! whitespace segments are dropped, and every token is lowercased. The same
//! analyzer runs at index time and at query time so that `gender:Female`
//! finds documents stored as `female`.

use std::fmt::Debug;

use unicode_segmentation::UnicodeSegmentation;

/// A single analyzed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The normalized token text.
    pub text: String,
    /// Position of the token in the token stream.
    pub position: usize,
}

impl Token {
    /// Create a new token.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
        }
    }
}

/// Trait for turning text into a token sequence.
pub trait Analyzer: Send + Sync + Debug {
    /// Analyze the given text.
    fn analyze(&self, text: &str) -> Vec<Token>;

    /// Name of this analyzer.
    fn name(&self) -> &'static str;

    /// Analyze and keep only the token texts.
    fn terms(&self, text: &str) -> Vec<String> {
        self.analyze(text).into_iter().map(|t| t.text).collect()
    }
}

/// Unicode word tokenizer followed by a lowercase filter.
#[derive(Clone, Debug, Default)]
pub struct StandardAnalyzer;

impl StandardAnalyzer {
    /// Create a new standard analyzer.
    pub fn new() -> Self {
        StandardAnalyzer
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Vec<Token> {
        text.unicode_words()
            .enumerate()
            .map(|(position, word)| Token::new(word.to_lowercase(), position))
            .collect()
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

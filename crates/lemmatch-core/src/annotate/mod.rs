//! Linguistic annotation: tokens, lemmas, punctuation flags and sentences.
//!
//! The matcher only depends on the [`Annotator`] trait. [`RuleAnnotator`] is
//! the shipped backend: a regex tokenizer plus a [`Lexicon`] lookup.

pub mod lexicon;

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::LexiconConfig;
use crate::error::AnnotatorResult;

pub use lexicon::Lexicon;

/// Words (with inner hyphens or apostrophes) or single non-space symbols.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:['’-]\w+)*|[^\w\s]").expect("valid regex"));

/// One token of annotated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedToken {
    /// Surface text, verbatim from the input.
    pub text: String,
    /// Lower-cased surface text.
    pub lower: String,
    /// Lemma of the lower-cased form.
    pub lemma: String,
    /// Byte offset of the first character in the input.
    pub start: usize,
    /// Byte offset one past the last character in the input.
    pub end: usize,
    /// Whether the token has no alphanumeric characters.
    pub is_punct: bool,
    /// Index of the enclosing sentence.
    pub sentence: usize,
}

/// A tokenized, lemmatized text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedDoc {
    /// Tokens in text order.
    pub tokens: Vec<AnnotatedToken>,
    /// Token index ranges, one per sentence.
    pub sentences: Vec<Range<usize>>,
}

impl AnnotatedDoc {
    /// Returns `true` if the document has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Produces an [`AnnotatedDoc`] for a piece of text.
///
/// Implementations must report byte offsets into the exact `text` passed in,
/// so that `&text[token.start..token.end] == token.text`.
pub trait Annotator: Send + Sync {
    /// Annotate `text`.
    fn annotate(&self, text: &str) -> AnnotatorResult<AnnotatedDoc>;
}

/// Regex tokenizer with dictionary lemmatization.
#[derive(Debug, Clone, Default)]
pub struct RuleAnnotator {
    lexicon: Lexicon,
}

impl RuleAnnotator {
    /// Create an annotator over the given lexicon.
    pub const fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Create an annotator, loading (and provisioning if needed) the
    /// configured lexicon.
    pub fn from_config(config: &LexiconConfig) -> AnnotatorResult<Self> {
        Lexicon::load(config).map(Self::new)
    }

    /// The lexicon used for lemmatization.
    pub const fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl Annotator for RuleAnnotator {
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    fn annotate(&self, text: &str) -> AnnotatorResult<AnnotatedDoc> {
        let mut tokens = Vec::new();
        let mut sentences = Vec::new();
        let mut sentence = 0;
        let mut sentence_start = 0;

        for m in TOKEN_PATTERN.find_iter(text) {
            let surface = m.as_str();
            let lower = surface.to_lowercase();
            let is_punct = !surface.chars().any(char::is_alphanumeric);
            let lemma = if is_punct {
                lower.clone()
            } else {
                self.lexicon
                    .lemma(&lower)
                    .map_or_else(|| lower.clone(), str::to_string)
            };

            tokens.push(AnnotatedToken {
                text: surface.to_string(),
                lower,
                lemma,
                start: m.start(),
                end: m.end(),
                is_punct,
                sentence,
            });

            if is_sentence_terminator(surface) {
                let idx = tokens.len();
                // A run of terminators ("?!", "...") closes a single sentence
                let next_is_terminator = text[m.end()..]
                    .chars()
                    .next()
                    .is_some_and(is_terminator_char);
                if !next_is_terminator {
                    sentences.push(sentence_start..idx);
                    sentence_start = idx;
                    sentence += 1;
                }
            }
        }

        if sentence_start < tokens.len() {
            sentences.push(sentence_start..tokens.len());
        }

        tracing::trace!(
            tokens = tokens.len(),
            sentences = sentences.len(),
            "text annotated"
        );
        Ok(AnnotatedDoc { tokens, sentences })
    }
}

fn is_terminator_char(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_sentence_terminator(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_terminator_char)
}

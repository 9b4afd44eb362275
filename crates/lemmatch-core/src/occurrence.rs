//! Occurrence records, type tags, counters and phrases.
//!
//! These are the values that flow between the matcher, the resolver, the
//! merge engine and the highlighter.

use std::collections::HashSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a found fragment relates to its base phrase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum VariantType {
    /// Identical to the base phrase.
    Exact,
    /// A different grammatical form.
    Inflected,
    /// Interrupted by punctuation or other words.
    Split,
    /// Words in a different order.
    Reordered,
    /// Surrounded or padded with extra words.
    Extended,
    /// Found by the lemma matcher.
    Lemma,
}

impl VariantType {
    /// All type tags, in reporting order.
    pub const ALL: [Self; 6] = [
        Self::Exact,
        Self::Inflected,
        Self::Split,
        Self::Reordered,
        Self::Extended,
        Self::Lemma,
    ];

    /// Returns the stable English tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Inflected => "inflected",
            Self::Split => "split",
            Self::Reordered => "reordered",
            Self::Extended => "extended",
            Self::Lemma => "lemma",
        }
    }

    /// Returns the Polish tag used in collaborator instructions and replies.
    pub const fn polish_tag(&self) -> &'static str {
        match self {
            Self::Exact => "dokładne",
            Self::Inflected => "odmiana",
            Self::Split => "rozdzielone",
            Self::Reordered => "przestawione",
            Self::Extended => "rozszerzone",
            Self::Lemma => "lematyzacja",
        }
    }

    /// Parse a type tag in either spelling. Matching is case-insensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == tag || t.polish_tag() == tag)
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which component produced an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// The offline lemma matcher.
    Linguistic,
    /// The generative collaborator.
    Generative,
}

impl Source {
    /// Returns the source as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linguistic => "linguistic",
            Self::Generative => "generative",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One confirmed match of a phrase variant to a literal text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Occurrence {
    /// The phrase this occurrence was found for.
    pub base_phrase: String,
    /// The literal matched substring, verbatim from the analyzed text.
    pub fragment: String,
    /// Classification of the match.
    #[serde(rename = "type")]
    pub variant_type: VariantType,
    /// Component that produced the match.
    pub source: Source,
}

/// Per-type occurrence counts.
///
/// `total` is maintained by [`TypeCounts::record`] and always equals the sum
/// of the six per-type counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TypeCounts {
    /// Exact matches.
    pub exact: usize,
    /// Inflected forms.
    pub inflected: usize,
    /// Split occurrences.
    pub split: usize,
    /// Reordered occurrences.
    pub reordered: usize,
    /// Extended occurrences.
    pub extended: usize,
    /// Lemma-matcher occurrences.
    pub lemma: usize,
    /// Number of retained occurrences.
    pub total: usize,
}

impl TypeCounts {
    /// Count one retained occurrence of the given type.
    pub const fn record(&mut self, variant_type: VariantType) {
        *self.slot(variant_type) += 1;
        self.total += 1;
    }

    /// Returns the count for one type.
    pub const fn get(&self, variant_type: VariantType) -> usize {
        match variant_type {
            VariantType::Exact => self.exact,
            VariantType::Inflected => self.inflected,
            VariantType::Split => self.split,
            VariantType::Reordered => self.reordered,
            VariantType::Extended => self.extended,
            VariantType::Lemma => self.lemma,
        }
    }

    /// Sum of the six per-type counts.
    pub fn sum_of_types(&self) -> usize {
        VariantType::ALL.iter().map(|t| self.get(*t)).sum()
    }

    const fn slot(&mut self, variant_type: VariantType) -> &mut usize {
        match variant_type {
            VariantType::Exact => &mut self.exact,
            VariantType::Inflected => &mut self.inflected,
            VariantType::Split => &mut self.split,
            VariantType::Reordered => &mut self.reordered,
            VariantType::Extended => &mut self.extended,
            VariantType::Lemma => &mut self.lemma,
        }
    }
}

/// Literal fragments accepted during one analysis run.
///
/// Lemma matches are inserted before generative variants, so a fragment both
/// sources report is attributed to the lemma matcher.
#[derive(Debug, Clone, Default)]
pub struct UniquenessSet {
    seen: HashSet<String>,
}

impl UniquenessSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `fragment`. Returns `true` if it was not present yet.
    pub fn insert(&mut self, fragment: &str) -> bool {
        if self.seen.contains(fragment) {
            return false;
        }
        self.seen.insert(fragment.to_string())
    }

    /// Returns `true` if `fragment` was already accepted.
    pub fn contains(&self, fragment: &str) -> bool {
        self.seen.contains(fragment)
    }

    /// Number of accepted fragments.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` if nothing was accepted yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// A user-supplied key phrase: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Phrase(String);

impl Phrase {
    /// Trim `raw` and wrap it. Returns `None` if nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    /// Returns the phrase text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse one phrase per line.
///
/// Blank lines are skipped and repeated phrases collapse to their first
/// occurrence.
pub fn parse_phrase_list(input: &str) -> Vec<Phrase> {
    let mut seen = HashSet::new();
    input
        .lines()
        .filter_map(Phrase::new)
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

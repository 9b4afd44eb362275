//! Core library for lemmatch.
//!
//! Finds occurrences of key phrases in a text, tolerating inflection,
//! reordering, interruption and extension. Two sources contribute: an
//! offline lemma matcher and an optional generative collaborator. Their
//! findings are merged so that every literal fragment is reported once.
//!
//! # Modules
//!
//! - [`annotate`] - Tokenization, lemmatization and sentence boundaries
//! - [`matcher`] - Exact/lemma phrase matching
//! - [`resolver`] - Fuzzy variants from a generative collaborator
//! - [`engine`] - Merging, deduplication and counting
//! - [`highlight`] - Marking retained fragments in the text
//! - [`occurrence`] - Records, type tags and counters
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use lemmatch_core::{ConfigLoader, FuzzyResolver, PhraseFinder, RuleAnnotator, parse_phrase_list};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let annotator = RuleAnnotator::from_config(&config.lexicon).expect("lexicon");
//! let resolver = FuzzyResolver::from_config(&config.generative).expect("http client");
//! let phrases = parse_phrase_list("sztuczna inteligencja\nanaliza danych");
//!
//! let report = PhraseFinder::new(&annotator)
//!     .with_resolver(&resolver)
//!     .find("Sztuczna inteligencja zmienia świat.", &phrases)
//!     .expect("analysis");
//! println!("found {} occurrences", report.counts.total);
//! ```
#![deny(unsafe_code)]

pub mod annotate;
pub mod config;
pub mod dictionaries;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod matcher;
pub mod occurrence;
pub mod resolver;

/// Default maximum input size in bytes (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

pub use annotate::{AnnotatedDoc, AnnotatedToken, Annotator, Lexicon, RuleAnnotator};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel, MatchMode};
pub use engine::{Notice, NoticeKind, PhraseFinder, PhraseReport, find_phrases};
pub use error::{
    AnalysisError, AnalysisResult, AnnotatorError, AnnotatorResult, ConfigError, ConfigResult,
    ResolveError, ResolveResult,
};
pub use highlight::{HighlightStyle, highlight_spans, highlight_text};
pub use matcher::LemmaMatcher;
pub use occurrence::{
    Occurrence, Phrase, Source, TypeCounts, UniquenessSet, VariantType, parse_phrase_list,
};
pub use resolver::{ChatClient, FuzzyResolver, GenerativeClient, VariantResolver};

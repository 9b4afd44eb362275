//! Dictionaries for lemmatization.
//!
//! Provides the built-in form → lemma table used by the rule-based annotator
//! when no external lexicon covers a word.

pub mod polish;

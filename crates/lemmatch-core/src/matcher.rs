//! Exact/lemma phrase matcher.
//!
//! Aligns the annotated phrase against every candidate start in the annotated
//! body. A body token matches a phrase token when their lemmas or their
//! lower-cased surfaces are equal. Up to `max_punct_skips` consecutive
//! punctuation tokens may sit between two matched phrase tokens.

use std::ops::Range;

use crate::annotate::{AnnotatedDoc, AnnotatedToken};
use crate::occurrence::{Occurrence, Source, UniquenessSet, VariantType};

/// Default number of punctuation tokens that may interrupt a phrase.
pub const DEFAULT_MAX_PUNCT_SKIPS: usize = 1;

/// Offline, deterministic phrase matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LemmaMatcher {
    max_punct_skips: usize,
}

impl Default for LemmaMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PUNCT_SKIPS)
    }
}

impl LemmaMatcher {
    /// Create a matcher that tolerates `max_punct_skips` consecutive
    /// punctuation tokens before each phrase token. `0` disables skipping.
    pub const fn new(max_punct_skips: usize) -> Self {
        Self { max_punct_skips }
    }

    /// The configured punctuation skip bound.
    pub const fn max_punct_skips(&self) -> usize {
        self.max_punct_skips
    }

    /// Byte ranges of every full match, in order of their start token.
    ///
    /// Overlapping matches from different start tokens are all returned.
    pub fn find_spans(&self, body: &AnnotatedDoc, phrase: &AnnotatedDoc) -> Vec<Range<usize>> {
        let Some(first) = phrase.tokens.first() else {
            return Vec::new();
        };

        body.tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| tokens_match(token, first))
            .filter_map(|(start, _)| self.align(&body.tokens, &phrase.tokens[1..], start))
            .collect()
    }

    /// Literal fragments of `text` for every full match.
    ///
    /// `body` must be the annotation of `text`.
    pub fn find_fragments<'t>(
        &self,
        text: &'t str,
        body: &AnnotatedDoc,
        phrase: &AnnotatedDoc,
    ) -> Vec<&'t str> {
        self.find_spans(body, phrase)
            .into_iter()
            .filter_map(|span| text.get(span))
            .collect()
    }

    /// Lemma occurrences of `base_phrase` not yet present in `seen`.
    ///
    /// Every returned fragment is inserted into `seen`.
    #[tracing::instrument(skip_all, fields(phrase = base_phrase))]
    pub fn match_phrase(
        &self,
        text: &str,
        body: &AnnotatedDoc,
        phrase: &AnnotatedDoc,
        base_phrase: &str,
        seen: &mut UniquenessSet,
    ) -> Vec<Occurrence> {
        let found: Vec<Occurrence> = self
            .find_fragments(text, body, phrase)
            .into_iter()
            .filter(|fragment| seen.insert(fragment))
            .map(|fragment| Occurrence {
                base_phrase: base_phrase.to_string(),
                fragment: fragment.to_string(),
                variant_type: VariantType::Lemma,
                source: Source::Linguistic,
            })
            .collect();
        tracing::debug!(found = found.len(), "lemma matching done");
        found
    }

    /// Extend a match starting at `start` over the remaining phrase tokens.
    fn align(
        &self,
        body: &[AnnotatedToken],
        rest: &[AnnotatedToken],
        start: usize,
    ) -> Option<Range<usize>> {
        let mut cursor = start + 1;
        let mut last = start;

        for expected in rest {
            let mut skipped = 0;
            loop {
                let candidate = body.get(cursor)?;
                if tokens_match(candidate, expected) {
                    last = cursor;
                    cursor += 1;
                    break;
                }
                if candidate.is_punct && skipped < self.max_punct_skips && cursor + 1 < body.len()
                {
                    skipped += 1;
                    cursor += 1;
                    continue;
                }
                return None;
            }
        }

        Some(body[start].start..body[last].end)
    }
}

fn tokens_match(body: &AnnotatedToken, phrase: &AnnotatedToken) -> bool {
    body.lemma == phrase.lemma || body.lower == phrase.lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{Annotator, RuleAnnotator};

    fn fragments(matcher: LemmaMatcher, text: &str, phrase: &str) -> Vec<String> {
        let annotator = RuleAnnotator::default();
        let body = annotator.annotate(text).unwrap();
        let phrase = annotator.annotate(phrase).unwrap();
        matcher
            .find_fragments(text, &body, &phrase)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn matches_case_insensitively_and_keeps_original_casing() {
        let text = "Sztuczna inteligencja zmienia świat. Inteligencja sztuczna też.";
        let found = fragments(LemmaMatcher::default(), text, "sztuczna inteligencja");
        assert_eq!(found, vec!["Sztuczna inteligencja"]);
    }

    #[test]
    fn matches_inflected_forms_through_lemmas() {
        let text = "Rozwój sztucznej inteligencji przyspiesza.";
        let found = fragments(LemmaMatcher::default(), text, "sztuczna inteligencja");
        assert_eq!(found, vec!["sztucznej inteligencji"]);
    }

    #[test]
    fn reordered_words_do_not_match() {
        let found = fragments(
            LemmaMatcher::default(),
            "Inteligencja sztuczna też.",
            "sztuczna inteligencja",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn one_punctuation_token_is_skipped() {
        let text = "Mówimy o sztucznej, inteligencji.";
        let found = fragments(LemmaMatcher::default(), text, "sztuczna inteligencja");
        assert_eq!(found, vec!["sztucznej, inteligencji"]);
    }

    #[test]
    fn later_tokens_align_after_a_skipped_punctuation_token() {
        let text = "Postępy: uczenie, maszynowe modeli językowych.";
        let found = fragments(LemmaMatcher::default(), text, "uczenie maszynowe model");
        assert_eq!(found, vec!["uczenie, maszynowe modeli"]);

        // The skip does not consume a phrase position
        let found = fragments(LemmaMatcher::default(), "uczenie, modeli", "uczenie maszynowe model");
        assert!(found.is_empty());
    }

    #[test]
    fn skip_bound_is_respected() {
        let text = "sztuczna ,; inteligencja";
        assert!(fragments(LemmaMatcher::new(1), text, "sztuczna inteligencja").is_empty());
        assert_eq!(
            fragments(LemmaMatcher::new(2), text, "sztuczna inteligencja"),
            vec!["sztuczna ,; inteligencja"]
        );
    }

    #[test]
    fn zero_skips_disables_punctuation_tolerance() {
        let text = "sztuczna, inteligencja";
        assert!(fragments(LemmaMatcher::new(0), text, "sztuczna inteligencja").is_empty());
    }

    #[test]
    fn words_between_phrase_tokens_break_the_match() {
        // Punctuation in the phrase must be matched literally
        let found = fragments(LemmaMatcher::default(), "dane i analiza", "dane, analiza");
        assert!(found.is_empty());
    }

    #[test]
    fn running_past_the_end_abandons_candidate() {
        let found = fragments(LemmaMatcher::default(), "to jest sztuczna", "sztuczna inteligencja");
        assert!(found.is_empty());
        let found = fragments(LemmaMatcher::default(), "sztuczna.", "sztuczna inteligencja");
        assert!(found.is_empty());
    }

    #[test]
    fn single_token_phrase_checks_start_only() {
        let text = "Dane, danych i danymi.";
        let found = fragments(LemmaMatcher::default(), text, "dane");
        assert_eq!(found, vec!["Dane", "danych", "danymi"]);
    }

    #[test]
    fn overlapping_spans_from_different_starts_are_kept() {
        let found = fragments(LemmaMatcher::default(), "dane dane dane", "dane dane");
        assert_eq!(found, vec!["dane dane", "dane dane"]);
    }

    #[test]
    fn match_phrase_deduplicates_through_uniqueness_set() {
        let annotator = RuleAnnotator::default();
        let text = "dane dane dane";
        let body = annotator.annotate(text).unwrap();
        let phrase = annotator.annotate("dane dane").unwrap();
        let mut seen = UniquenessSet::new();

        let found = LemmaMatcher::default().match_phrase(text, &body, &phrase, "dane dane", &mut seen);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fragment, "dane dane");
        assert_eq!(found[0].variant_type, VariantType::Lemma);
        assert_eq!(found[0].source, Source::Linguistic);
        assert!(seen.contains("dane dane"));

        // A second pass adds nothing new
        let again = LemmaMatcher::default().match_phrase(text, &body, &phrase, "dane dane", &mut seen);
        assert!(again.is_empty());
    }

    #[test]
    fn matching_is_idempotent() {
        let text = "Sztuczna inteligencja i sztucznej, inteligencji oraz Sztuczną inteligencją.";
        let first = fragments(LemmaMatcher::default(), text, "sztuczna inteligencja");
        let second = fragments(LemmaMatcher::default(), text, "sztuczna inteligencja");
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn empty_phrase_document_matches_nothing() {
        let annotator = RuleAnnotator::default();
        let body = annotator.annotate("dane").unwrap();
        let spans = LemmaMatcher::default().find_spans(&body, &AnnotatedDoc::default());
        assert!(spans.is_empty());
    }
}

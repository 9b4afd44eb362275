//! Merge and dedup engine.
//!
//! Runs the lemma matcher and then the fuzzy resolver for each phrase,
//! keeping every literal fragment at most once per run. Lemma matches always
//! enter the uniqueness set before generative claims for the same phrase.
//! Counters are recomputed from the retained records; whatever the
//! collaborator reports about its own answer is only logged.

use std::collections::HashSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::annotate::Annotator;
use crate::error::{AnalysisError, AnalysisResult, ResolveError};
use crate::matcher::LemmaMatcher;
use crate::occurrence::{Occurrence, Phrase, Source, TypeCounts, UniquenessSet};
use crate::resolver::{Resolution, VariantResolver};

/// What a [`Notice`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The credential is missing or was rejected; the resolver is off for the
    /// rest of the run.
    CredentialRejected,
    /// The collaborator failed for one phrase.
    ResolverUnavailable,
    /// Claimed fragments that do not occur in the text were dropped.
    UnverifiedDropped,
}

impl NoticeKind {
    /// Returns the kind as a snake_case string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CredentialRejected => "credential_rejected",
            Self::ResolverUnavailable => "resolver_unavailable",
            Self::UnverifiedDropped => "unverified_dropped",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-facing message raised during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notice {
    /// Phrase being processed when the notice was raised.
    pub phrase: String,
    /// Category.
    pub kind: NoticeKind,
    /// Human-readable description.
    pub message: String,
}

/// Result of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PhraseReport {
    /// Retained occurrences: per phrase, lemma matches then generative variants.
    pub occurrences: Vec<Occurrence>,
    /// Per-type counters over `occurrences`.
    pub counts: TypeCounts,
    /// Notices raised during the run.
    #[serde(default)]
    pub notices: Vec<Notice>,
}

impl PhraseReport {
    /// Returns `true` if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Occurrences found for one phrase.
    pub fn for_phrase<'a>(&'a self, phrase: &'a str) -> impl Iterator<Item = &'a Occurrence> {
        self.occurrences
            .iter()
            .filter(move |o| o.base_phrase == phrase)
    }

    fn push(&mut self, occurrence: Occurrence) {
        self.counts.record(occurrence.variant_type);
        self.occurrences.push(occurrence);
    }

    fn notice(&mut self, phrase: &Phrase, kind: NoticeKind, message: String) {
        self.notices.push(Notice {
            phrase: phrase.to_string(),
            kind,
            message,
        });
    }
}

/// Configurable phrase search over one text.
///
/// ```
/// use lemmatch_core::{Phrase, PhraseFinder, RuleAnnotator};
///
/// let annotator = RuleAnnotator::default();
/// let phrases = [Phrase::new("sztuczna inteligencja").unwrap()];
/// let report = PhraseFinder::new(&annotator)
///     .find("Sztuczna inteligencja zmienia świat.", &phrases)
///     .unwrap();
/// assert_eq!(report.occurrences[0].fragment, "Sztuczna inteligencja");
/// assert_eq!(report.counts.total, 1);
/// ```
#[derive(Clone, Copy)]
pub struct PhraseFinder<'a> {
    annotator: &'a dyn Annotator,
    resolver: Option<&'a dyn VariantResolver>,
    matcher: LemmaMatcher,
    input_limit: Option<usize>,
}

impl fmt::Debug for PhraseFinder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhraseFinder")
            .field("resolver", &self.resolver.is_some())
            .field("matcher", &self.matcher)
            .field("input_limit", &self.input_limit)
            .finish_non_exhaustive()
    }
}

impl<'a> PhraseFinder<'a> {
    /// Create an offline finder (lemma matching only).
    pub fn new(annotator: &'a dyn Annotator) -> Self {
        Self {
            annotator,
            resolver: None,
            matcher: LemmaMatcher::default(),
            input_limit: None,
        }
    }

    /// Also query `resolver` for fuzzy variants.
    pub const fn with_resolver(mut self, resolver: &'a dyn VariantResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Set the matcher's punctuation skip bound.
    pub const fn with_max_punct_skips(mut self, max_punct_skips: usize) -> Self {
        self.matcher = LemmaMatcher::new(max_punct_skips);
        self
    }

    /// Reject texts longer than `limit` bytes. `None` disables the check.
    pub const fn with_input_limit(mut self, limit: Option<usize>) -> Self {
        self.input_limit = limit;
        self
    }

    /// Find all phrases in `text`.
    pub fn find(&self, text: &str, phrases: &[Phrase]) -> AnalysisResult<PhraseReport> {
        self.find_with_progress(text, phrases, |_, _, _| {})
    }

    /// Find all phrases in `text`, calling `progress(index, count, phrase)`
    /// before each distinct phrase is processed.
    #[tracing::instrument(skip_all, fields(text_len = text.len(), phrases = phrases.len()))]
    pub fn find_with_progress<F>(
        &self,
        text: &str,
        phrases: &[Phrase],
        mut progress: F,
    ) -> AnalysisResult<PhraseReport>
    where
        F: FnMut(usize, usize, &Phrase),
    {
        if let Some(limit) = self.input_limit
            && text.len() > limit
        {
            return Err(AnalysisError::InputTooLarge {
                size: text.len(),
                limit,
            });
        }

        let mut distinct = HashSet::new();
        let phrases: Vec<&Phrase> = phrases.iter().filter(|p| distinct.insert(*p)).collect();

        let mut report = PhraseReport::default();
        if phrases.is_empty() {
            return Ok(report);
        }

        let body = self.annotator.annotate(text)?;
        let mut seen = UniquenessSet::new();
        let mut resolver = self.resolver;

        for (index, &phrase) in phrases.iter().enumerate() {
            progress(index, phrases.len(), phrase);

            let annotated = self.annotator.annotate(phrase.as_str())?;
            let lemma_hits =
                self.matcher
                    .match_phrase(text, &body, &annotated, phrase.as_str(), &mut seen);
            for occurrence in lemma_hits {
                report.push(occurrence);
            }

            let Some(active) = resolver else {
                continue;
            };
            match active.resolve(text, phrase.as_str()) {
                Ok(resolution) => merge_resolution(&mut report, &mut seen, text, phrase, resolution),
                Err(err) if err.is_auth() => {
                    tracing::warn!(error = %err, "disabling generative resolver for this run");
                    report.notice(phrase, NoticeKind::CredentialRejected, credential_message(&err));
                    resolver = None;
                }
                Err(err) => {
                    tracing::warn!(phrase = %phrase, error = %err, "generative resolver failed");
                    report.notice(
                        phrase,
                        NoticeKind::ResolverUnavailable,
                        format!("fuzzy variants unavailable: {err}"),
                    );
                }
            }
        }

        tracing::info!(
            occurrences = report.counts.total,
            notices = report.notices.len(),
            "phrase search complete"
        );
        Ok(report)
    }
}

/// Add verified, not yet seen generative claims to the report.
fn merge_resolution(
    report: &mut PhraseReport,
    seen: &mut UniquenessSet,
    text: &str,
    phrase: &Phrase,
    resolution: Resolution,
) {
    let claimed = resolution.variants.len();
    let mut retained = 0;
    let mut unverified = 0;

    for variant in resolution.variants {
        if !text.contains(&variant.fragment) {
            tracing::debug!(fragment = %variant.fragment, "claimed fragment not in text");
            unverified += 1;
            continue;
        }
        if !seen.insert(&variant.fragment) {
            continue;
        }
        retained += 1;
        report.push(Occurrence {
            base_phrase: phrase.to_string(),
            fragment: variant.fragment,
            variant_type: variant.variant_type,
            source: Source::Generative,
        });
    }

    if let Some(reported) = resolution.reported.total
        && reported != claimed
    {
        tracing::debug!(
            phrase = %phrase,
            reported,
            claimed,
            retained,
            "collaborator statistics disagree with its fragment list"
        );
    }

    if unverified > 0 {
        report.notice(
            phrase,
            NoticeKind::UnverifiedDropped,
            format!("dropped {unverified} claimed fragment(s) that do not occur in the text"),
        );
    }
}

fn credential_message(err: &ResolveError) -> String {
    match err {
        ResolveError::MissingCredential => {
            "no API key configured; fuzzy variants disabled, lemma matching continues".to_string()
        }
        other => format!("{other}; fuzzy variants disabled, lemma matching continues"),
    }
}

/// Find `phrases` in `text` with the given annotator and optional resolver.
///
/// Uses the default matcher settings and no input size limit.
pub fn find_phrases(
    text: &str,
    phrases: &[Phrase],
    annotator: &dyn Annotator,
    resolver: Option<&dyn VariantResolver>,
) -> AnalysisResult<PhraseReport> {
    let finder = PhraseFinder::new(annotator);
    match resolver {
        Some(resolver) => finder.with_resolver(resolver).find(text, phrases),
        None => finder.find(text, phrases),
    }
}

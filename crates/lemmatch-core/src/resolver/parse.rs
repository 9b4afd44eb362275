//! Tolerant parser for collaborator replies.
//!
//! A reply is read line by line with two states: after the fragments header,
//! lines of the form `"<quote>" (typ: <tag>)` yield claimed variants; after
//! the statistics header, lines of the form `<label>: <count>` update the
//! self-reported counts. Everything else is ignored.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::prompt::{FRAGMENTS_HEADER, STATS_HEADER, TOTAL_LABEL};
use crate::occurrence::VariantType;

/// `"<quote>" (typ: <tag>)`
static VARIANT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"\s*\(typ:\s*(\w+)\)"#).expect("valid regex"));

/// `<label>: <count>`
static STATS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^:]+):\s*(\d+)").expect("valid regex"));

/// Tags the collaborator is allowed to assign.
const COLLABORATOR_TYPES: [VariantType; 5] = [
    VariantType::Exact,
    VariantType::Inflected,
    VariantType::Split,
    VariantType::Reordered,
    VariantType::Extended,
];

/// A fragment the collaborator claims to have found. Not verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClaimedVariant {
    /// Quoted text as returned by the collaborator.
    pub fragment: String,
    /// Claimed classification.
    #[serde(rename = "type")]
    pub variant_type: VariantType,
}

/// Counts the collaborator reported about its own answer.
///
/// Informational only; never used for the final counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedStats {
    /// Reported count per type.
    pub per_type: BTreeMap<VariantType, usize>,
    /// Reported total, if present.
    pub total: Option<usize>,
}

/// Result of parsing one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    /// Claimed variants in reply order.
    pub variants: Vec<ClaimedVariant>,
    /// Self-reported statistics.
    pub reported: ReportedStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Fragments,
    Stats,
}

/// Parse a free-form collaborator reply.
pub fn parse_reply(reply: &str) -> ParsedReply {
    let mut parsed = ParsedReply::default();
    let mut section = Section::Preamble;

    for line in reply.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.contains(FRAGMENTS_HEADER) {
            section = Section::Fragments;
            continue;
        }
        if line.contains(STATS_HEADER) {
            section = Section::Stats;
            continue;
        }

        match section {
            Section::Preamble => {}
            Section::Fragments => {
                if let Some(variant) = parse_variant_line(line) {
                    parsed.variants.push(variant);
                }
            }
            Section::Stats => parse_stats_line(line, &mut parsed.reported),
        }
    }

    parsed
}

fn parse_variant_line(line: &str) -> Option<ClaimedVariant> {
    let caps = VARIANT_LINE.captures(line)?;
    let tag = caps[2].to_lowercase();
    let Some(variant_type) = VariantType::from_tag(&tag).filter(|t| COLLABORATOR_TYPES.contains(t))
    else {
        tracing::trace!(tag = %tag, "ignoring unknown type tag");
        return None;
    };
    Some(ClaimedVariant {
        fragment: caps[1].to_string(),
        variant_type,
    })
}

fn parse_stats_line(line: &str, stats: &mut ReportedStats) {
    let Some(caps) = STATS_LINE.captures(line) else {
        return;
    };
    let label = caps[1].trim().to_lowercase();
    let Ok(value) = caps[2].parse::<usize>() else {
        return;
    };

    if label.contains(TOTAL_LABEL) {
        stats.total = Some(value);
        return;
    }
    if let Some(t) = COLLABORATOR_TYPES
        .into_iter()
        .find(|t| label.contains(t.polish_tag()) || label.contains(t.as_str()))
    {
        stats.per_type.insert(t, value);
    }
}

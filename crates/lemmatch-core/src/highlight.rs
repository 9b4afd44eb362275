//! Highlighting of retained fragments.
//!
//! Every literal, case-sensitive occurrence of every fragment is a candidate
//! span. Candidates are accepted longest first (earliest on ties) and any
//! candidate overlapping an accepted span is skipped, so a fragment nested in
//! a longer one never produces a nested marker. The text is rendered once.

use std::collections::BTreeMap;
use std::ops::Range;

use aho_corasick::{AhoCorasick, MatchKind};

use crate::occurrence::Occurrence;

const HTML_OPEN: &str = r#"<mark style="background-color: #FFE4B5">"#;
const HTML_CLOSE: &str = "</mark>";
const HTML_WRAP_OPEN: &str = r#"<div style="white-space: pre-wrap;">"#;
const HTML_WRAP_CLOSE: &str = "</div>";

/// Markers used when rendering highlighted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    /// Inserted before each highlighted span.
    pub open: String,
    /// Inserted after each highlighted span.
    pub close: String,
    /// Replacement for line breaks.
    pub line_break: String,
    /// Escape `&`, `<`, `>`, `"` and `'` in the text.
    pub escape_html: bool,
    /// Optional prefix and suffix around the whole output.
    pub wrapper: Option<(String, String)>,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::html()
    }
}

impl HighlightStyle {
    /// `<mark>` spans, `<br>` line breaks, wrapped in a `pre-wrap` `<div>`.
    pub fn html() -> Self {
        Self {
            open: HTML_OPEN.to_string(),
            close: HTML_CLOSE.to_string(),
            line_break: "<br>".to_string(),
            escape_html: true,
            wrapper: Some((HTML_WRAP_OPEN.to_string(), HTML_WRAP_CLOSE.to_string())),
        }
    }

    /// Raw markers around spans, text and line breaks untouched.
    pub fn plain(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            line_break: "\n".to_string(),
            escape_html: false,
            wrapper: None,
        }
    }
}

/// Non-overlapping byte ranges to highlight, in text order.
pub fn highlight_spans<'f, I>(text: &str, fragments: I) -> Vec<Range<usize>>
where
    I: IntoIterator<Item = &'f str>,
{
    let mut patterns: Vec<&str> = fragments.into_iter().filter(|f| !f.is_empty()).collect();
    patterns.sort_unstable();
    patterns.dedup();
    if patterns.is_empty() {
        return Vec::new();
    }

    let mut candidates = candidate_spans(text, &patterns);
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));

    // start -> end of accepted spans; they never overlap, so only the
    // nearest accepted span starting before `span.end` can collide.
    let mut accepted: BTreeMap<usize, usize> = BTreeMap::new();
    for span in candidates {
        let collides = accepted
            .range(..span.end)
            .next_back()
            .is_some_and(|(_, &end)| end > span.start);
        if !collides {
            accepted.insert(span.start, span.end);
        }
    }
    accepted.into_iter().map(|(start, end)| start..end).collect()
}

/// Every occurrence of every pattern, overlaps included.
fn candidate_spans(text: &str, patterns: &[&str]) -> Vec<Range<usize>> {
    match AhoCorasick::builder()
        .match_kind(MatchKind::Standard)
        .build(patterns)
    {
        Ok(ac) => ac
            .find_overlapping_iter(text)
            .map(|m| m.start()..m.end())
            .collect(),
        Err(err) => {
            tracing::warn!(error = %err, "falling back to per-fragment search");
            patterns
                .iter()
                .flat_map(|p| {
                    text.match_indices(p)
                        .map(|(start, m)| start..start + m.len())
                })
                .collect()
        }
    }
}

/// Render `text` with `spans` wrapped in the style's markers.
///
/// `spans` must be sorted, non-overlapping and on character boundaries, as
/// returned by [`highlight_spans`].
pub fn render(text: &str, spans: &[Range<usize>], style: &HighlightStyle) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * (style.open.len() + 8));
    if let Some((prefix, _)) = &style.wrapper {
        out.push_str(prefix);
    }

    let mut cursor = 0;
    let mut after_cr = false;
    for span in spans {
        push_segment(&mut out, &text[cursor..span.start], style, &mut after_cr);
        out.push_str(&style.open);
        push_segment(&mut out, &text[span.clone()], style, &mut after_cr);
        out.push_str(&style.close);
        cursor = span.end;
    }
    push_segment(&mut out, &text[cursor..], style, &mut after_cr);

    if let Some((_, suffix)) = &style.wrapper {
        out.push_str(suffix);
    }
    out
}

/// `after_cr` carries a trailing `\r` across segments so a CRLF split by a
/// span boundary still yields one line break.
fn push_segment(out: &mut String, segment: &str, style: &HighlightStyle, after_cr: &mut bool) {
    for c in segment.chars() {
        let prev_cr = std::mem::replace(after_cr, c == '\r');
        match c {
            '\n' if prev_cr => {}
            '\n' | '\r' => out.push_str(&style.line_break),
            '&' if style.escape_html => out.push_str("&amp;"),
            '<' if style.escape_html => out.push_str("&lt;"),
            '>' if style.escape_html => out.push_str("&gt;"),
            '"' if style.escape_html => out.push_str("&quot;"),
            '\'' if style.escape_html => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Highlight the fragments of `records` in `text` with `style`.
#[tracing::instrument(skip_all, fields(text_len = text.len(), records = records.len()))]
pub fn highlight_with(text: &str, records: &[Occurrence], style: &HighlightStyle) -> String {
    let spans = highlight_spans(text, records.iter().map(|r| r.fragment.as_str()));
    tracing::debug!(spans = spans.len(), "highlighting");
    render(text, &spans, style)
}

/// Highlight the fragments of `records` in `text` as HTML.
pub fn highlight_text(text: &str, records: &[Occurrence]) -> String {
    highlight_with(text, records, &HighlightStyle::html())
}

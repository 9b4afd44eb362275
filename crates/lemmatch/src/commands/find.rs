//! Find command: phrase and variant search over a text file.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, instrument};

use lemmatch_core::config::{Config, GenerativeConfig, MatchMode};
use lemmatch_core::highlight::{highlight_spans, highlight_text};
use lemmatch_core::{
    Annotator, FuzzyResolver, Occurrence, Phrase, PhraseFinder, PhraseReport, RuleAnnotator,
    VariantType, parse_phrase_list,
};

use super::read_input_file;

/// Arguments for the `find` subcommand.
#[derive(Args, Debug)]
pub struct FindArgs {
    /// Text file to search.
    pub file: Utf8PathBuf,

    /// File with one phrase per line.
    #[arg(long, value_name = "FILE", conflicts_with = "phrase", required_unless_present = "phrase")]
    pub phrases: Option<Utf8PathBuf>,

    /// Phrase to search for (repeatable).
    #[arg(short = 'p', long = "phrase", value_name = "PHRASE")]
    pub phrase: Vec<String>,

    /// Sources to use (overrides config).
    #[arg(long, value_enum)]
    pub mode: Option<MatchMode>,

    /// Punctuation tokens allowed between phrase words (overrides config).
    #[arg(long, value_name = "N")]
    pub max_skips: Option<usize>,

    /// Print the text with found fragments highlighted.
    #[arg(long)]
    pub highlight: bool,

    /// Write the text with found fragments highlighted as HTML.
    #[arg(long, value_name = "OUT")]
    pub html: Option<Utf8PathBuf>,
}

/// Settings for one analysis run.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    /// Sources to use.
    pub mode: MatchMode,
    /// Punctuation skip bound for the lemma matcher.
    pub max_punct_skips: usize,
    /// Maximum text size in bytes.
    pub input_limit: Option<usize>,
}

impl AnalysisOptions {
    /// Options taken from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: config.mode,
            max_punct_skips: config.matcher.max_punct_skips,
            input_limit: config.input_limit(),
        }
    }
}

/// Run the matcher and, in full mode, the generative resolver.
///
/// Shared by the `find` command and the MCP server.
pub fn run_analysis<F>(
    text: &str,
    phrases: &[Phrase],
    annotator: &dyn Annotator,
    generative: &GenerativeConfig,
    options: AnalysisOptions,
    progress: F,
) -> anyhow::Result<PhraseReport>
where
    F: FnMut(usize, usize, &Phrase),
{
    let finder = PhraseFinder::new(annotator)
        .with_max_punct_skips(options.max_punct_skips)
        .with_input_limit(options.input_limit);

    let report = match options.mode {
        MatchMode::Offline => finder.find_with_progress(text, phrases, progress)?,
        MatchMode::Full => {
            let resolver = FuzzyResolver::from_config(generative)
                .context("failed to set up the generative collaborator client")?;
            finder
                .with_resolver(&resolver)
                .find_with_progress(text, phrases, progress)?
        }
    };
    Ok(report)
}

/// Find phrases in a file and print the occurrences.
#[instrument(name = "cmd_find", skip_all, fields(file = %args.file))]
pub fn cmd_find(
    args: FindArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let options = AnalysisOptions {
        mode: args.mode.unwrap_or(config.mode),
        max_punct_skips: args.max_skips.unwrap_or(config.matcher.max_punct_skips),
        input_limit: max_input_bytes,
    };
    debug!(?options, highlight = args.highlight, html = ?args.html, "executing find command");

    let text = read_input_file(&args.file, max_input_bytes)?;
    let phrases = match &args.phrases {
        Some(path) => parse_phrase_list(&read_input_file(path, max_input_bytes)?),
        None => parse_phrase_list(&args.phrase.join("\n")),
    };

    let annotator =
        RuleAnnotator::from_config(&config.lexicon).context("failed to load the lexicon")?;

    let bar = progress_bar(phrases.len(), global_json);
    let report = run_analysis(
        &text,
        &phrases,
        &annotator,
        &config.generative,
        options,
        |index, _, phrase| {
            bar.set_position(index as u64);
            bar.set_message(phrase.to_string());
        },
    )
    .with_context(|| format!("failed to analyze {}", args.file))?;
    bar.finish_and_clear();

    if let Some(ref out) = args.html {
        std::fs::write(out, highlight_text(&text, &report.occurrences))
            .with_context(|| format!("failed to write {out}"))?;
        debug!(path = %out, "wrote highlighted HTML");
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    if args.highlight {
        println!();
        println!("{}", render_terminal(&text, &report.occurrences));
    }
    if let Some(ref out) = args.html {
        println!("{} {}", "Wrote".dimmed(), out.cyan());
    }
    Ok(())
}

fn progress_bar(len: usize, hidden: bool) -> ProgressBar {
    if hidden || len == 0 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}") {
        bar.set_style(style);
    }
    bar
}

/// Occurrences sorted by base phrase, then alphabetically by type tag;
/// stable within a group.
fn sorted_occurrences(occurrences: &[Occurrence]) -> Vec<&Occurrence> {
    let mut sorted: Vec<&Occurrence> = occurrences.iter().collect();
    sorted.sort_by(|a, b| {
        a.base_phrase
            .cmp(&b.base_phrase)
            .then_with(|| a.variant_type.as_str().cmp(b.variant_type.as_str()))
    });
    sorted
}

fn print_report(report: &PhraseReport) {
    if report.is_empty() {
        println!("{}", "No occurrences found.".yellow());
    } else {
        let rows = sorted_occurrences(&report.occurrences);
        let phrase_w = column_width("Phrase", rows.iter().map(|o| o.base_phrase.as_str()));
        let type_w = column_width("Type", rows.iter().map(|o| o.variant_type.as_str()));
        let source_w = column_width("Source", rows.iter().map(|o| o.source.as_str()));

        println!(
            "{:<phrase_w$}  {:<type_w$}  {:<source_w$}  {}",
            "Phrase".bold(),
            "Type".bold(),
            "Source".bold(),
            "Fragment".bold(),
        );
        for occ in rows {
            println!(
                "{:<phrase_w$}  {:<type_w$}  {:<source_w$}  {}",
                occ.base_phrase,
                occ.variant_type.as_str(),
                occ.source.as_str(),
                occ.fragment.green(),
            );
        }
    }

    println!();
    println!("{}", "Counts".bold().underline());
    for variant_type in VariantType::ALL {
        println!(
            "{:>10}: {}",
            variant_type.as_str().dimmed(),
            report.counts.get(variant_type)
        );
    }
    println!("{:>10}: {}", "total".bold(), report.counts.total);

    if !report.notices.is_empty() {
        eprintln!();
        for notice in &report.notices {
            eprintln!(
                "{} [{}] {}: {}",
                "notice:".yellow().bold(),
                notice.kind,
                notice.phrase,
                notice.message
            );
        }
    }
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

/// Text with found fragments highlighted using terminal colors.
fn render_terminal(text: &str, occurrences: &[Occurrence]) -> String {
    let spans = highlight_spans(text, occurrences.iter().map(|o| o.fragment.as_str()));
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        out.push_str(&text[cursor..span.start]);
        let fragment = &text[span.clone()];
        out.push_str(
            &fragment
                .if_supports_color(Stream::Stdout, |s| s.black().on_yellow())
                .to_string(),
        );
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lemmatch_core::Source;

    fn occ(phrase: &str, fragment: &str, variant_type: VariantType) -> Occurrence {
        Occurrence {
            base_phrase: phrase.into(),
            fragment: fragment.into(),
            variant_type,
            source: Source::Generative,
        }
    }

    #[test]
    fn occurrences_sort_by_phrase_then_type_tag() {
        let list = vec![
            occ("b", "b-split", VariantType::Split),
            occ("a", "a-reordered", VariantType::Reordered),
            occ("b", "b-exact", VariantType::Exact),
            occ("a", "a-lemma", VariantType::Lemma),
            occ("a", "a-extended", VariantType::Extended),
            occ("a", "a-inflected", VariantType::Inflected),
            occ("a", "a-lemma-2", VariantType::Lemma),
        ];
        let sorted: Vec<&str> = sorted_occurrences(&list)
            .iter()
            .map(|o| o.fragment.as_str())
            .collect();
        assert_eq!(
            sorted,
            vec![
                "a-extended",
                "a-inflected",
                "a-lemma",
                "a-lemma-2",
                "a-reordered",
                "b-exact",
                "b-split"
            ]
        );
    }

    #[test]
    fn offline_analysis_needs_no_credential() {
        let annotator = RuleAnnotator::default();
        let phrases = parse_phrase_list("sztuczna inteligencja");
        let options = AnalysisOptions {
            mode: MatchMode::Offline,
            max_punct_skips: 1,
            input_limit: None,
        };
        let report = run_analysis(
            "Sztuczna inteligencja zmienia świat.",
            &phrases,
            &annotator,
            &GenerativeConfig::default(),
            options,
            |_, _, _| {},
        )
        .unwrap();
        assert_eq!(report.counts.total, 1);
        assert!(report.notices.is_empty());
    }

    #[test]
    fn full_analysis_without_credential_raises_notice() {
        let annotator = RuleAnnotator::default();
        let phrases = parse_phrase_list("świat");
        let options = AnalysisOptions {
            mode: MatchMode::Full,
            max_punct_skips: 1,
            input_limit: None,
        };
        let report = run_analysis(
            "Sztuczna inteligencja zmienia świat.",
            &phrases,
            &annotator,
            &GenerativeConfig::default(),
            options,
            |_, _, _| {},
        )
        .unwrap();
        assert_eq!(report.counts.lemma, 1);
        assert_eq!(report.notices.len(), 1);
        assert_eq!(
            report.notices[0].kind,
            lemmatch_core::NoticeKind::CredentialRejected
        );
    }

    #[test]
    fn terminal_render_keeps_text_without_colors() {
        owo_colors::set_override(false);
        let text = "Sztuczna inteligencja zmienia świat.";
        let rendered = render_terminal(text, &[occ("x", "świat", VariantType::Lemma)]);
        assert_eq!(rendered, text);
    }

    #[test]
    fn column_width_counts_chars() {
        assert_eq!(column_width("Type", ["świat"].into_iter()), 5);
        assert_eq!(column_width("Phrase", ["a"].into_iter()), 6);
    }
}

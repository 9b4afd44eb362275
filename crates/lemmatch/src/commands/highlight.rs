//! Highlight command: render a saved report as HTML.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use lemmatch_core::PhraseReport;
use lemmatch_core::highlight::highlight_text;

use super::read_input_file;

/// Arguments for the `highlight` subcommand.
#[derive(Args, Debug)]
pub struct HighlightArgs {
    /// Text file the report was produced from.
    pub file: Utf8PathBuf,

    /// JSON report written by `lemmatch find --json`.
    #[arg(long, value_name = "REPORT")]
    pub report: Utf8PathBuf,

    /// Write HTML here instead of stdout.
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<Utf8PathBuf>,
}

/// Render the text of `file` with the report's fragments highlighted.
#[instrument(name = "cmd_highlight", skip_all, fields(file = %args.file, report = %args.report))]
pub fn cmd_highlight(
    args: HighlightArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(output = ?args.output, "executing highlight command");

    let text = read_input_file(&args.file, max_input_bytes)?;
    let raw = read_input_file(&args.report, max_input_bytes)?;
    let report: PhraseReport = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a lemmatch JSON report", args.report))?;

    let missing = report
        .occurrences
        .iter()
        .filter(|o| !text.contains(&o.fragment))
        .count();
    if missing > 0 {
        tracing::warn!(missing, "report fragments not found in the text");
    }

    let html = highlight_text(&text, &report.occurrences);

    match args.output {
        Some(ref out) => {
            std::fs::write(out, &html).with_context(|| format!("failed to write {out}"))?;
            if global_json {
                let summary = serde_json::json!({
                    "output": out,
                    "occurrences": report.occurrences.len(),
                    "missing": missing,
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{} {}", "Wrote".dimmed(), out.cyan());
            }
        }
        None => println!("{html}"),
    }
    Ok(())
}

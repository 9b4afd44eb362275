//! Info command implementation

use clap::Args;
use lemmatch_core::config::{Config, ConfigSources};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct GenerativeInfo {
    endpoint: String,
    model: String,
    temperature: f64,
    /// `"set"` or `"missing"`; the key itself is never printed.
    api_key: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
    mode: String,
    max_punct_skips: usize,
    generative: GenerativeInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    lexicon_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lexicon_url: Option<String>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let generative = &config.generative;
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            max_input_bytes: config.input_limit(),
            mode: config.mode.as_str().to_string(),
            max_punct_skips: config.matcher.max_punct_skips,
            generative: GenerativeInfo {
                endpoint: generative.endpoint.clone(),
                model: generative.model.clone(),
                temperature: generative.temperature,
                api_key: if generative.credential().is_some() {
                    "set"
                } else {
                    "missing"
                },
                timeout_secs: generative.timeout_secs,
            },
            lexicon_path: config.lexicon.path.as_ref().map(|p| p.to_string()),
            lexicon_url: config.lexicon.url.clone(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let info = PackageInfo::new();

    debug!(json_output = global_json, "executing info command");

    let config_info = ConfigInfo::from_config(config, sources);
    let full_info = FullInfo {
        package: info,
        config: config_info,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        full_info.package.name.bold(),
        full_info.package.version.green()
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), full_info.package.license);
    }
    if !full_info.package.repository.is_empty() {
        println!(
            "{}: {}",
            "Repository".dimmed(),
            full_info.package.repository.cyan()
        );
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    if let Some(ref path) = cfg.config_file {
        println!("{}: {}", "Config file".dimmed(), path.cyan());
    } else {
        println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(ref dir) = cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    match cfg.max_input_bytes {
        Some(max) => println!("{}: {} bytes", "Input limit".dimmed(), max),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    println!();
    println!("{}", "Matching".bold().underline());
    println!("{}: {}", "Mode".dimmed(), cfg.mode);
    println!("{}: {}", "Max punctuation skips".dimmed(), cfg.max_punct_skips);
    print_opt("Lexicon", cfg.lexicon_path.as_deref());
    print_opt("Lexicon URL", cfg.lexicon_url.as_deref());

    println!();
    println!("{}", "Generative collaborator".bold().underline());
    println!("{}: {}", "Endpoint".dimmed(), cfg.generative.endpoint.cyan());
    println!("{}: {}", "Model".dimmed(), cfg.generative.model);
    println!("{}: {:.1}", "Temperature".dimmed(), cfg.generative.temperature);
    if cfg.generative.api_key == "set" {
        println!("{}: {}", "API key".dimmed(), "set".green());
    } else {
        println!("{}: {}", "API key".dimmed(), "missing".yellow());
    }
    print_opt("Timeout (s)", cfg.generative.timeout_secs.as_ref());

    Ok(())
}

/// Print an optional value or "(not set)".
fn print_opt<T: std::fmt::Display + ?Sized>(label: &str, value: Option<&T>) {
    match value {
        Some(v) => println!("{}: {}", label.dimmed(), v),
        None => println!("{}: {}", label.dimmed(), "(not set)".dimmed()),
    }
}

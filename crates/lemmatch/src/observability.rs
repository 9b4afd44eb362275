//! Logging and tracing setup.
//!
//! Human-readable logs go to stderr so stdout stays clean for command output.
//! When a log file or directory is configured, JSONL logs are also written
//! there through a non-blocking appender.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Env var naming an explicit log file.
pub const LOG_PATH_ENV: &str = "LEMMATCH_LOG_PATH";
/// Env var naming a log directory.
pub const LOG_DIR_ENV: &str = "LEMMATCH_LOG_DIR";

const DEFAULT_LOG_FILE: &str = "lemmatch.jsonl";

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// JSONL log file. `None` disables file logging.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, falling back to the
    /// configured `log_dir`.
    ///
    /// Precedence: `LEMMATCH_LOG_PATH`, then `LEMMATCH_LOG_DIR`, then `log_dir`.
    pub fn from_env_with_overrides(log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            log_dir,
        )
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let log_file = env_path
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| {
                env_dir
                    .filter(|d| !d.as_os_str().is_empty())
                    .or(config_dir)
                    .map(|dir| dir.join(DEFAULT_LOG_FILE))
            });
        Self { log_file }
    }
}

/// Keeps the background log writer alive. Drop it at exit to flush.
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file: Option<WorkerGuard>,
}

/// Build the log filter.
///
/// `RUST_LOG` wins when set. Otherwise `--quiet` means errors only, `-v`
/// means debug, `-vv` and beyond mean trace, and the configured level is
/// used when neither flag is given.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => config_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, file_guard) = match &config.log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_current_span(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(ObservabilityGuard { _file: file_guard })
}

fn file_writer(
    path: &Path,
) -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log path has no file name: {}", path.display()))?;
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let cfg = ObservabilityConfig::resolve(
            Some(PathBuf::from("/tmp/a.jsonl")),
            Some(PathBuf::from("/tmp/env-dir")),
            Some(PathBuf::from("/tmp/cfg-dir")),
        );
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/a.jsonl")));
    }

    #[test]
    fn env_dir_beats_config_dir() {
        let cfg = ObservabilityConfig::resolve(
            None,
            Some(PathBuf::from("/tmp/env-dir")),
            Some(PathBuf::from("/tmp/cfg-dir")),
        );
        assert_eq!(
            cfg.log_file,
            Some(PathBuf::from("/tmp/env-dir").join(DEFAULT_LOG_FILE))
        );
    }

    #[test]
    fn config_dir_is_fallback() {
        let cfg = ObservabilityConfig::resolve(None, None, Some(PathBuf::from("/tmp/cfg-dir")));
        assert_eq!(
            cfg.log_file,
            Some(PathBuf::from("/tmp/cfg-dir").join(DEFAULT_LOG_FILE))
        );
    }

    #[test]
    fn nothing_configured_disables_file_logs() {
        let cfg = ObservabilityConfig::resolve(Some(PathBuf::new()), None, None);
        assert_eq!(cfg.log_file, None);
    }

    #[test]
    fn file_writer_creates_parent_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("logs").join("run.jsonl");
        let (_writer, _guard) = file_writer(&path).unwrap();
        assert!(tmp.path().join("logs").is_dir());
    }
}

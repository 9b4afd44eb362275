//! Form → lemma lexicon.
//!
//! The built-in Polish table is always available. An external lexicon file
//! (`form<TAB>lemma` per line, `#` starts a comment) extends and overrides it.

use std::collections::HashMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::{LexiconConfig, user_data_dir};
use crate::dictionaries::polish::polish_lemma;
use crate::error::{AnnotatorError, AnnotatorResult};

/// File name used when a lexicon is provisioned without an explicit path.
const DEFAULT_LEXICON_FILE: &str = "lexicon.tsv";

/// Lemma lookup over the built-in table plus optional external entries.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    extra: HashMap<String, String>,
}

impl Lexicon {
    /// A lexicon backed only by the built-in table.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Look up the lemma of a lower-cased form.
    ///
    /// External entries win over the built-in table. Returns `None` for
    /// unknown forms.
    pub fn lemma(&self, form: &str) -> Option<&str> {
        self.extra
            .get(form)
            .map(String::as_str)
            .or_else(|| polish_lemma(form))
    }

    /// Number of external entries.
    pub fn extra_len(&self) -> usize {
        self.extra.len()
    }

    /// Parse lexicon entries from TSV text.
    ///
    /// `path` is only used for error reporting.
    pub fn parse(input: &str, path: &Utf8Path) -> AnnotatorResult<Self> {
        let mut extra = HashMap::new();
        for (idx, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = || AnnotatorError::LexiconParse {
                path: path.to_path_buf(),
                line: idx + 1,
            };
            let (form, lemma) = line.split_once('\t').ok_or_else(malformed)?;
            let (form, lemma) = (form.trim(), lemma.trim());
            if form.is_empty() || lemma.is_empty() || lemma.contains('\t') {
                return Err(malformed());
            }
            extra.insert(form.to_lowercase(), lemma.to_lowercase());
        }
        Ok(Self { extra })
    }

    /// Read a lexicon file from disk.
    #[tracing::instrument]
    pub fn from_file(path: &Utf8Path) -> AnnotatorResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| AnnotatorError::LexiconRead {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::parse(&content, path)?;
        tracing::debug!(entries = lexicon.extra_len(), "lexicon loaded");
        Ok(lexicon)
    }

    /// Load the lexicon described by `config`.
    ///
    /// - No path and no URL: built-in table only.
    /// - Path exists: read it.
    /// - Path missing and URL set: download into place, then read it.
    /// - Path missing and no URL: [`AnnotatorError::LexiconMissing`].
    ///
    /// Without a path, a configured URL is provisioned into the user data
    /// directory.
    #[tracing::instrument(skip(config), fields(path = ?config.path, url = ?config.url))]
    pub fn load(config: &LexiconConfig) -> AnnotatorResult<Self> {
        let Some(path) = resolve_path(config) else {
            return Ok(Self::builtin());
        };

        if !path.is_file() {
            let Some(url) = config.url.as_deref() else {
                return Err(AnnotatorError::LexiconMissing(path));
            };
            provision(url, &path)?;
        }

        Self::from_file(&path)
    }
}

fn resolve_path(config: &LexiconConfig) -> Option<Utf8PathBuf> {
    match (&config.path, &config.url) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(_)) => Some(
            user_data_dir()
                .unwrap_or_else(|| Utf8PathBuf::from("."))
                .join(DEFAULT_LEXICON_FILE),
        ),
        (None, None) => None,
    }
}

/// Download `url` to `dest`, creating parent directories.
#[tracing::instrument]
fn provision(url: &str, dest: &Utf8Path) -> AnnotatorResult<()> {
    tracing::info!("provisioning lexicon");
    let provision_err = |message: String| AnnotatorError::Provision {
        url: url.to_string(),
        message,
    };

    let body = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(reqwest::blocking::Response::text)
        .map_err(|e| provision_err(e.to_string()))?;

    if let Some(parent) = dest.parent()
        && !parent.as_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| provision_err(format!("cannot create {parent}: {e}")))?;
    }
    fs::write(dest, body).map_err(|e| provision_err(format!("cannot write {dest}: {e}")))?;
    Ok(())
}

//! Error types for lemmatch-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or provisioning the linguistic annotator.
///
/// These are fatal: without an annotator no offline matching can happen.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// The lexicon file exists but could not be read.
    #[error("failed to read lexicon {path}: {source}")]
    LexiconRead {
        /// Path of the lexicon file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A lexicon line is not a `form<TAB>lemma` pair.
    #[error("malformed lexicon entry at {path}:{line}")]
    LexiconParse {
        /// Path of the lexicon file.
        path: Utf8PathBuf,
        /// 1-indexed line number.
        line: usize,
    },

    /// The lexicon file is missing and no download URL is configured.
    #[error("lexicon not found at {0} and no lexicon.url is configured")]
    LexiconMissing(Utf8PathBuf),

    /// Downloading the lexicon failed.
    #[error("failed to provision lexicon from {url}: {message}")]
    Provision {
        /// URL the lexicon was fetched from.
        url: String,
        /// Description of the failure.
        message: String,
    },
}

/// Result type alias using [`AnnotatorError`].
pub type AnnotatorResult<T> = Result<T, AnnotatorError>;

/// Errors returned by the fuzzy variant resolver.
///
/// Only [`ResolveError::MissingCredential`] and [`ResolveError::Unauthorized`]
/// are configuration problems; everything else is transient and is turned
/// into "zero variants" by the engine.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No API key is configured for the generative collaborator.
    #[error("no API key configured for the generative collaborator (set generative.api_key)")]
    MissingCredential,

    /// The collaborator rejected the configured API key.
    #[error("the generative collaborator rejected the API key (HTTP {status})")]
    Unauthorized {
        /// HTTP status code returned (401 or 403).
        status: u16,
    },

    /// The request could not be sent or the response could not be read.
    #[error("request to the generative collaborator failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The collaborator answered with a non-success status.
    #[error("generative collaborator returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may be truncated).
        body: String,
    },

    /// The response did not have the expected shape.
    #[error("unexpected response from the generative collaborator: {0}")]
    Malformed(String),
}

impl ResolveError {
    /// Returns `true` for credential problems that will not go away by retrying.
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::Unauthorized { .. })
    }
}

/// Result type alias using [`ResolveError`].
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors that abort a whole phrase analysis run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The annotator could not process the input.
    #[error(transparent)]
    Annotator(#[from] AnnotatorError),

    /// The input text exceeds the configured size limit.
    #[error("input too large: {size} bytes (limit: {limit} bytes)")]
    InputTooLarge {
        /// Size of the input in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;

//! Error types for each layer of the catalog engine.
//!
//! Configuration errors are fatal at load time. Fetch, template and
//! no-match failures are folded into [`ResolveError`] and never cross the
//! source boundary; only an empty catalog ([`CatalogError`]) aborts a run.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed or incomplete source configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("source configuration must contain a top-level 'sources' list")]
    MissingSources,
    #[error("source #{index} ({distribution}): {reason}")]
    InvalidSource {
        index: usize,
        distribution: String,
        reason: String,
    },
    #[error("source {distribution}: invalid {field} regex: {source}")]
    Regex {
        distribution: String,
        field: String,
        source: regex::Error,
    },
}

/// A template could not be rendered against its context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error(
        "missing placeholder(s) {} in template '{template}'; available context keys: {}",
        .missing.join(", "),
        .available.join(", ")
    )]
    MissingPlaceholders {
        template: String,
        missing: Vec<String>,
        available: Vec<String>,
    },
    #[error("malformed template '{template}': {reason}")]
    Malformed { template: String, reason: String },
}

/// Network failure for a single fetch. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url}: {source}")]
    Curl { url: String, source: curl::Error },
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
}

/// Failure to turn one source (or one version of it) into catalog entries.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("no artifacts matched regex for {url}")]
    NoMatches { url: String },
    #[error("static source requires a non-empty 'versions' list")]
    EmptyVersionList,
    #[error("cannot resolve '{reference}' against {base}: {source}")]
    Url {
        base: String,
        reference: String,
        source: url::ParseError,
    },
    #[error("no artifacts generated; failures: {}", .failures.join("; "))]
    AllVersionsFailed { failures: Vec<String> },
}

/// Fatal outcome of a whole catalog run.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no distribution entries were generated ({warnings} source warning(s))")]
    Empty { warnings: usize },
}

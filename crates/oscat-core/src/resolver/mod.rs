//! Strategy resolver: turns one source definition into catalog entries.
//!
//! Each mirror layout is its own module; [`resolve`] dispatches on the closed
//! [`Strategy`] enum. Only the network listing and the templates vary
//! between strategies, the entry shape is shared.

mod dated;
mod flat;
mod static_list;
mod versioned;

use crate::catalog::CatalogEntry;
use crate::error::ResolveError;
use crate::extract::{extract_matches, order_unique, Order};
use crate::http::Fetch;
use crate::source::{SourceDefinition, Strategy};
use crate::template::{render, Context};
use regex::Regex;

/// A per-version failure that did not sink the whole source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionWarning {
    pub version: String,
    pub message: String,
}

/// Entries produced for one source plus any versions that were skipped.
#[derive(Debug, Default)]
pub struct Resolution {
    pub entries: Vec<CatalogEntry>,
    pub warnings: Vec<VersionWarning>,
}

impl From<Vec<CatalogEntry>> for Resolution {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries,
            warnings: Vec::new(),
        }
    }
}

/// Resolves `source` into catalog entries, fetching listings through `fetcher`.
pub fn resolve(source: &SourceDefinition, fetcher: &dyn Fetch) -> Result<Resolution, ResolveError> {
    tracing::debug!(
        distribution = %source.distribution,
        strategy = ?source.strategy,
        "resolving source"
    );
    match source.strategy {
        Strategy::DatedDirectory => dated::resolve(source, fetcher).map(Resolution::from),
        Strategy::FlatListing => flat::resolve(source, fetcher).map(Resolution::from),
        Strategy::Static => static_list::resolve(source).map(Resolution::from),
        Strategy::VersionedFlatListing => versioned::resolve(source, fetcher),
    }
}

/// Builds one entry, rendering the optional checksum template ("" when absent).
fn make_entry(
    source: &SourceDefinition,
    download_url: String,
    checksum_template: Option<&str>,
    context: &Context,
) -> Result<CatalogEntry, ResolveError> {
    let checksum_url = match checksum_template {
        Some(t) if !t.is_empty() => render(t, context)?,
        _ => String::new(),
    };
    Ok(CatalogEntry {
        distribution: source.distribution.clone(),
        kind: source.kind.clone(),
        download_url,
        checksum_url,
        checksum: source.checksum.clone(),
    })
}

/// Fetches `source.listing_url` and returns the newest versions, limited to `max_entries`.
///
/// Each version keeps the named groups of its first match.
fn discover_versions(
    source: &SourceDefinition,
    version_regex: Option<&Regex>,
    fetcher: &dyn Fetch,
) -> Result<Vec<(String, Context)>, ResolveError> {
    let listing_url = &source.listing_url;
    let Some(re) = version_regex else {
        return Err(ResolveError::NoMatches {
            url: listing_url.clone(),
        });
    };
    let html = fetcher.fetch_text(listing_url)?;
    let matches = extract_matches(&html, re);
    if matches.is_empty() {
        return Err(ResolveError::NoMatches {
            url: listing_url.clone(),
        });
    }
    let ordered = order_unique(matches.iter().map(|m| m.value.clone()), Order::Descending);
    let with_groups = ordered
        .into_iter()
        .map(|value| {
            let groups = matches
                .iter()
                .find(|m| m.value == value)
                .map(|m| m.groups.clone())
                .unwrap_or_default();
            (value, groups)
        })
        .collect();
    Ok(source.max_entries.apply(with_groups))
}

/// Resolves a listing href against the page it came from.
fn join_url(base: &str, reference: &str) -> Result<String, ResolveError> {
    let err = |source| ResolveError::Url {
        base: base.to_string(),
        reference: reference.to_string(),
        source,
    };
    let base_url = url::Url::parse(base).map_err(err)?;
    Ok(base_url.join(reference).map_err(err)?.to_string())
}

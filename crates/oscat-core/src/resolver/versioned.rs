//! `versioned_flat_listing`: version directories, each with its own artifact listing.
//!
//! A failure inside one version directory is recorded and the crawl moves on;
//! the source only fails when no version produced anything.

use super::{discover_versions, join_url, make_entry, Resolution, VersionWarning};
use crate::catalog::CatalogEntry;
use crate::error::ResolveError;
use crate::extract::extract_matches;
use crate::http::Fetch;
use crate::source::SourceDefinition;
use crate::template::{render, Context};

pub(super) fn resolve(
    source: &SourceDefinition,
    fetcher: &dyn Fetch,
) -> Result<Resolution, ResolveError> {
    let versions = discover_versions(source, source.version_regex.as_ref(), fetcher)?;

    let mut resolution = Resolution::default();
    for (version, groups) in versions {
        match resolve_version(source, &version, groups, fetcher) {
            Ok(mut entries) => resolution.entries.append(&mut entries),
            Err(e) => {
                tracing::warn!(
                    distribution = %source.distribution,
                    %version,
                    "skipping version: {}",
                    e
                );
                resolution.warnings.push(VersionWarning {
                    version,
                    message: e.to_string(),
                });
            }
        }
    }

    if resolution.entries.is_empty() {
        return Err(ResolveError::AllVersionsFailed {
            failures: resolution
                .warnings
                .iter()
                .map(|w| format!("{}: {}", w.version, w.message))
                .collect(),
        });
    }
    Ok(resolution)
}

fn resolve_version(
    source: &SourceDefinition,
    version: &str,
    version_groups: Context,
    fetcher: &dyn Fetch,
) -> Result<Vec<CatalogEntry>, ResolveError> {
    let mut context = Context::new();
    context.insert("version".into(), version.to_string());
    context.insert("listing_url".into(), source.listing_url.clone());
    context.extend(version_groups);

    let sub_template = source.sub_listing_template.as_deref().unwrap_or_default();
    let sub_listing_url = render(sub_template, &context)?;
    let no_matches = || ResolveError::NoMatches {
        url: sub_listing_url.clone(),
    };
    let re = source.artifact_regex.as_ref().ok_or_else(no_matches)?;

    let html = fetcher.fetch_text(&sub_listing_url)?;
    let matches = extract_matches(&html, re);
    if matches.is_empty() {
        return Err(no_matches());
    }

    // Document order, no dedup: the first artifacts listed win.
    let selected = source.max_artifacts.apply(matches);

    let mut entries = Vec::with_capacity(selected.len());
    for m in selected {
        let mut entry_context = context.clone();
        entry_context.insert("sub_listing_url".into(), sub_listing_url.clone());
        entry_context.insert("match".into(), m.value.clone());
        entry_context.extend(m.groups);

        let download_url = match source.download_template.as_deref() {
            Some(t) if !t.is_empty() => render(t, &entry_context)?,
            _ => join_url(&sub_listing_url, &m.value)?,
        };
        entries.push(make_entry(
            source,
            download_url,
            source.checksum_template.as_deref(),
            &entry_context,
        )?);
    }
    Ok(entries)
}

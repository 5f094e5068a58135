//! `flat_listing`: one listing page links the artifacts directly.

use super::{join_url, make_entry};
use crate::catalog::CatalogEntry;
use crate::error::ResolveError;
use crate::extract::{extract_matches, order_unique, Order};
use crate::http::Fetch;
use crate::source::SourceDefinition;
use crate::template::{render, Context};

pub(super) fn resolve(
    source: &SourceDefinition,
    fetcher: &dyn Fetch,
) -> Result<Vec<CatalogEntry>, ResolveError> {
    let listing_url = &source.listing_url;
    let no_matches = || ResolveError::NoMatches {
        url: listing_url.clone(),
    };
    let re = source.artifact_regex.as_ref().ok_or_else(no_matches)?;

    let html = fetcher.fetch_text(listing_url)?;
    let matches = extract_matches(&html, re);
    if matches.is_empty() {
        return Err(no_matches());
    }

    let unique = order_unique(matches.iter().map(|m| m.value.clone()), Order::Descending);
    let selected = source.max_entries.apply(unique);

    let mut entries = Vec::with_capacity(selected.len());
    for value in selected {
        let groups = matches
            .iter()
            .find(|m| m.value == value)
            .map(|m| m.groups.clone())
            .unwrap_or_default();
        let mut context = Context::new();
        context.insert("match".into(), value.clone());
        context.insert("listing_url".into(), listing_url.clone());
        context.extend(groups);

        let download_url = match source.download_template.as_deref() {
            Some(t) if !t.is_empty() => render(t, &context)?,
            _ => join_url(listing_url, &value)?,
        };
        entries.push(make_entry(
            source,
            download_url,
            source.checksum_template.as_deref(),
            &context,
        )?);
    }
    Ok(entries)
}

//! `dated_directory`: the listing page links one directory per version.

use super::{discover_versions, make_entry};
use crate::catalog::CatalogEntry;
use crate::error::ResolveError;
use crate::http::Fetch;
use crate::source::SourceDefinition;
use crate::template::{render, Context};

pub(super) fn resolve(
    source: &SourceDefinition,
    fetcher: &dyn Fetch,
) -> Result<Vec<CatalogEntry>, ResolveError> {
    let versions = discover_versions(source, source.version_regex.as_ref(), fetcher)?;
    let default_download = source.download_template.as_deref().unwrap_or_default();

    let mut entries = Vec::with_capacity(versions.len());
    for (version, groups) in versions {
        let mut download_template = default_download;
        let mut checksum_template = source.checksum_template.as_deref();
        let mut context = Context::new();
        context.insert("version".into(), version.clone());
        context.insert("listing_url".into(), source.listing_url.clone());
        context.extend(groups);

        if let Some(rule) = source.override_for(&version) {
            tracing::debug!(
                distribution = %source.distribution,
                %version,
                pattern = rule.pattern.as_str(),
                "override applied"
            );
            if let Some(t) = rule.download_template.as_deref() {
                download_template = t;
            }
            if let Some(t) = rule.checksum_template.as_deref() {
                checksum_template = Some(t);
            }
            context.extend(rule.extra_context.clone());
        }

        let download_url = render(download_template, &context)?;
        entries.push(make_entry(source, download_url, checksum_template, &context)?);
    }
    Ok(entries)
}

//! `static`: a literal version list rendered through the templates, no fetch.

use super::make_entry;
use crate::catalog::CatalogEntry;
use crate::error::ResolveError;
use crate::source::SourceDefinition;
use crate::template::{render, Context};

pub(super) fn resolve(source: &SourceDefinition) -> Result<Vec<CatalogEntry>, ResolveError> {
    if source.versions.is_empty() {
        return Err(ResolveError::EmptyVersionList);
    }
    // Checked when the source was loaded; an empty template still renders to "".
    let download_template = source.download_template.as_deref().unwrap_or_default();

    source
        .versions
        .iter()
        .map(|version| -> Result<CatalogEntry, ResolveError> {
            let context = Context::from([
                ("version".to_string(), version.clone()),
                ("listing_url".to_string(), source.listing_url.clone()),
            ]);
            let download_url = render(download_template, &context)?;
            make_entry(source, download_url, source.checksum_template.as_deref(), &context)
        })
        .collect()
}

//! Runs every configured source and merges the results into one catalog.

use super::Catalog;
use crate::error::CatalogError;
use crate::http::Fetch;
use crate::resolver;
use crate::source::SourceDefinition;
use std::fmt;
use std::time::Duration;

/// A source (or one version of it) that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWarning {
    pub distribution: String,
    pub version: Option<String>,
    pub message: String,
}

impl fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {}: {}", self.distribution, v, self.message),
            None => write!(f, "{}: {}", self.distribution, self.message),
        }
    }
}

/// Sorted catalog plus everything that was skipped on the way.
#[derive(Debug)]
pub struct CatalogReport {
    pub catalog: Catalog,
    pub warnings: Vec<SourceWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Pause before moving on to a different distribution.
    pub distribution_delay: Duration,
}

/// Resolves `sources` in order, isolating failures per source.
///
/// Returns [`CatalogError::Empty`] only when no source produced an entry.
pub fn assemble(
    sources: &[SourceDefinition],
    fetcher: &dyn Fetch,
    opts: &AssembleOptions,
) -> Result<CatalogReport, CatalogError> {
    let mut catalog = Catalog::default();
    let mut warnings = Vec::new();
    let mut previous: Option<&str> = None;

    for source in sources {
        let name = source.distribution.as_str();
        if previous.is_some_and(|p| p != name) && !opts.distribution_delay.is_zero() {
            std::thread::sleep(opts.distribution_delay);
        }
        previous = Some(name);

        match resolver::resolve(source, fetcher) {
            Ok(resolution) => {
                tracing::info!(
                    distribution = name,
                    entries = resolution.entries.len(),
                    "source resolved"
                );
                warnings.extend(resolution.warnings.into_iter().map(|w| SourceWarning {
                    distribution: name.to_string(),
                    version: Some(w.version),
                    message: w.message,
                }));
                catalog.distributions.extend(resolution.entries);
            }
            Err(e) => {
                tracing::warn!(distribution = name, "skipping source: {}", e);
                warnings.push(SourceWarning {
                    distribution: name.to_string(),
                    version: None,
                    message: e.to_string(),
                });
            }
        }
    }

    if catalog.distributions.is_empty() {
        return Err(CatalogError::Empty {
            warnings: warnings.len(),
        });
    }
    catalog.sort();
    Ok(CatalogReport { catalog, warnings })
}

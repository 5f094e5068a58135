//! `oscat update` – crawl every configured source and write the catalog.

use anyhow::{Context, Result};
use oscat_core::catalog::{assemble, AssembleOptions, Catalog, SourceWarning};
use oscat_core::config::OscatConfig;
use oscat_core::http::CurlFetcher;
use oscat_core::source::load_sources;
use std::path::Path;

/// Catalog text printed by `--dry-run`: indented with `--pretty`, compact
/// otherwise, always newline-terminated.
pub(crate) fn dry_run_output(catalog: &Catalog, pretty: bool) -> Result<String> {
    let mut out = catalog.to_json(pretty)?;
    if !pretty {
        out.push('\n');
    }
    Ok(out)
}

/// Summary line for stderr, splitting skipped sources from skipped versions.
pub(crate) fn warning_summary(warnings: &[SourceWarning]) -> Option<String> {
    if warnings.is_empty() {
        return None;
    }
    let versions = warnings.iter().filter(|w| w.version.is_some()).count();
    let sources = warnings.len() - versions;
    Some(format!(
        "completed with {} warning(s): {} source(s) skipped, {} version(s) skipped",
        warnings.len(),
        sources,
        versions
    ))
}

pub fn run_update(
    cfg: &OscatConfig,
    sources_path: &Path,
    output: &Path,
    pretty: bool,
    dry_run: bool,
) -> Result<()> {
    // Configuration errors are fatal before any network activity.
    let sources = load_sources(sources_path)?;
    tracing::info!(
        sources = sources.len(),
        path = %sources_path.display(),
        "loaded source configuration"
    );

    let fetcher = CurlFetcher::new(&cfg.http);
    let opts = AssembleOptions {
        distribution_delay: cfg.distribution_delay(),
    };
    let report = assemble(&sources, &fetcher, &opts).context("catalog update failed")?;

    if dry_run {
        print!("{}", dry_run_output(&report.catalog, pretty)?);
    } else {
        report.catalog.write_to(output, pretty)?;
        println!(
            "Wrote {} entries to {}",
            report.catalog.distributions.len(),
            output.display()
        );
    }

    if let Some(summary) = warning_summary(&report.warnings) {
        eprintln!("{}", summary);
        for w in &report.warnings {
            eprintln!("  - {}", w);
        }
    }
    Ok(())
}

//! `oscat download` / `oscat download-all` – fetch catalog artifacts to disk.

use anyhow::Result;
use oscat_core::catalog::Catalog;
use oscat_core::config::OscatConfig;
use oscat_core::download::{
    sync_all, sync_distribution, CurlDownloader, FileOutcome, SyncOptions, SyncReport,
};
use oscat_core::http::CurlFetcher;
use std::path::Path;

fn print_report(report: &SyncReport) {
    println!("{}:", report.distribution);
    if let Some(err) = &report.error {
        println!("  FAILED      {}", err);
    }
    for file in &report.files {
        let target = file
            .path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| file.download_url.clone());
        let verified = file
            .verification
            .map(|v| format!(" ({})", v.reason))
            .unwrap_or_default();
        match &file.outcome {
            FileOutcome::Kept => println!("  kept        {}{}", target, verified),
            FileOutcome::Downloaded => println!("  downloaded  {}{}", target, verified),
            FileOutcome::Failed(msg) => println!("  FAILED      {}: {}", target, msg),
        }
    }
    for path in &report.removed {
        println!("  removed     {}", path.display());
    }
}

fn options(cfg: &OscatConfig, verify: bool) -> SyncOptions {
    SyncOptions {
        verify,
        distribution_delay: cfg.distribution_delay(),
    }
}

pub fn run_download(
    cfg: &OscatConfig,
    catalog_path: &Path,
    name: &str,
    download_dir: &Path,
    verify: bool,
) -> Result<()> {
    let catalog = Catalog::load(catalog_path)?;
    let fetcher = CurlFetcher::new(&cfg.http);
    let downloader = CurlDownloader::new(&cfg.http);
    let report = sync_distribution(
        &catalog,
        name,
        download_dir,
        &options(cfg, verify),
        &fetcher,
        &downloader,
    )?;
    print_report(&report);
    let failures = report.failures();
    if failures > 0 {
        anyhow::bail!("{} file(s) of {} failed", failures, report.distribution);
    }
    Ok(())
}

pub fn run_download_all(
    cfg: &OscatConfig,
    catalog_path: &Path,
    download_dir: &Path,
    verify: bool,
) -> Result<()> {
    let catalog = Catalog::load(catalog_path)?;
    let fetcher = CurlFetcher::new(&cfg.http);
    let downloader = CurlDownloader::new(&cfg.http);
    let reports = sync_all(
        &catalog,
        download_dir,
        &options(cfg, verify),
        &fetcher,
        &downloader,
    );
    for report in &reports {
        print_report(report);
    }
    let failed: Vec<&str> = reports
        .iter()
        .filter(|r| r.failures() > 0)
        .map(|r| r.distribution.as_str())
        .collect();
    if !failed.is_empty() {
        eprintln!(
            "completed with {} warning(s): distribution(s) with failures: {}",
            failed.len(),
            failed.join(", ")
        );
    }
    Ok(())
}

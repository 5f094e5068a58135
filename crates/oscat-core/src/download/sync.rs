//! Keeps a local download directory in line with the catalog.
//!
//! Layout is `<download_dir>/<type>/<distribution>/<file>`. Existing files are
//! verified before being kept; anything in a distribution directory that the
//! catalog no longer references is removed.

use super::Download;
use crate::catalog::{Catalog, CatalogEntry};
use crate::http::Fetch;
use crate::url_model::{local_filename, sanitize_filename_for_linux};
use crate::verify::{verify_artifact, Verification};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Verify existing and freshly downloaded files.
    pub verify: bool,
    /// Pause between distributions in [`sync_all`].
    pub distribution_delay: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            verify: true,
            distribution_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Already present and passed verification (or verification was off).
    Kept,
    Downloaded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FileResult {
    pub download_url: String,
    pub path: Option<PathBuf>,
    pub outcome: FileOutcome,
    pub verification: Option<Verification>,
}

#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub distribution: String,
    pub files: Vec<FileResult>,
    /// Stale files removed after the pass.
    pub removed: Vec<PathBuf>,
    /// Set when the distribution could not be synced at all.
    pub error: Option<String>,
}

impl SyncReport {
    /// Failed files, plus one if the whole distribution failed.
    pub fn failures(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed(_)))
            .count()
            + usize::from(self.error.is_some())
    }
}

fn entry_dir(download_dir: &Path, entry: &CatalogEntry) -> PathBuf {
    download_dir
        .join(sanitize_filename_for_linux(&entry.kind))
        .join(sanitize_filename_for_linux(&entry.distribution))
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(file = %path.display(), "could not remove file: {}", e);
        }
    }
}

/// Downloads every catalog entry of `name` (ASCII case-insensitive).
///
/// Fails only when `name` is not in the catalog or a directory cannot be
/// created or listed; per-file problems are recorded in the report.
pub fn sync_distribution(
    catalog: &Catalog,
    name: &str,
    download_dir: &Path,
    opts: &SyncOptions,
    fetcher: &dyn Fetch,
    downloader: &dyn Download,
) -> Result<SyncReport> {
    let entries: Vec<&CatalogEntry> = catalog.entries_for(name).collect();
    let Some(first) = entries.first() else {
        anyhow::bail!("distribution not found in catalog: {}", name);
    };

    let mut report = SyncReport {
        distribution: first.distribution.clone(),
        ..SyncReport::default()
    };
    let mut keep: BTreeMap<PathBuf, BTreeSet<String>> = BTreeMap::new();

    for entry in entries {
        let dir = entry_dir(download_dir, entry);
        let Some(filename) = local_filename(&entry.download_url) else {
            tracing::warn!(url = %entry.download_url, "no usable filename in download URL");
            report.files.push(FileResult {
                download_url: entry.download_url.clone(),
                path: None,
                outcome: FileOutcome::Failed("no usable filename in download URL".into()),
                verification: None,
            });
            continue;
        };
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        keep.entry(dir.clone()).or_default().insert(filename.clone());
        let dest = dir.join(&filename);
        report.files.push(sync_entry(entry, dest, opts, fetcher, downloader));
    }

    for (dir, names) in &keep {
        for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
            let entry = entry.with_context(|| format!("read {}", dir.display()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !names.contains(&name) {
                tracing::info!(file = %path.display(), "removing stale file");
                remove_quietly(&path);
                report.removed.push(path);
            }
        }
    }
    Ok(report)
}

fn sync_entry(
    entry: &CatalogEntry,
    dest: PathBuf,
    opts: &SyncOptions,
    fetcher: &dyn Fetch,
    downloader: &dyn Download,
) -> FileResult {
    let check = |path: &Path| verify_artifact(path, entry.checksum_url(), entry.checksum(), fetcher);
    let result = |outcome: FileOutcome, verification: Option<Verification>| FileResult {
        download_url: entry.download_url.clone(),
        path: Some(dest.clone()),
        outcome,
        verification,
    };

    if dest.is_file() {
        if !opts.verify {
            tracing::info!(file = %dest.display(), "already present, verification disabled");
            return result(FileOutcome::Kept, None);
        }
        let v = check(&dest);
        if v.success {
            tracing::info!(file = %dest.display(), reason = %v.reason, "already present");
            return result(FileOutcome::Kept, Some(v));
        }
        tracing::warn!(file = %dest.display(), "existing file failed verification, re-downloading");
        remove_quietly(&dest);
    }

    if let Err(e) = downloader.download(&entry.download_url, &dest) {
        tracing::warn!(url = %entry.download_url, "download failed: {:#}", e);
        return result(FileOutcome::Failed(format!("{:#}", e)), None);
    }
    if !opts.verify {
        return result(FileOutcome::Downloaded, None);
    }
    let v = check(&dest);
    if v.success {
        tracing::info!(file = %dest.display(), reason = %v.reason, "downloaded");
        result(FileOutcome::Downloaded, Some(v))
    } else {
        tracing::warn!(file = %dest.display(), "downloaded file failed verification, removing");
        remove_quietly(&dest);
        result(
            FileOutcome::Failed("verification failed after download".into()),
            Some(v),
        )
    }
}

/// Runs [`sync_distribution`] for each distinct distribution in catalog order.
///
/// A distribution that fails outright is logged, recorded in its report's
/// `error`, and the run moves on.
pub fn sync_all(
    catalog: &Catalog,
    download_dir: &Path,
    opts: &SyncOptions,
    fetcher: &dyn Fetch,
    downloader: &dyn Download,
) -> Vec<SyncReport> {
    let mut reports = Vec::new();
    for (i, name) in catalog.distribution_names().into_iter().enumerate() {
        if i > 0 && !opts.distribution_delay.is_zero() {
            std::thread::sleep(opts.distribution_delay);
        }
        let report = sync_distribution(catalog, name, download_dir, opts, fetcher, downloader)
            .unwrap_or_else(|e| {
                tracing::warn!(distribution = name, "sync failed: {:#}", e);
                SyncReport {
                    distribution: name.to_string(),
                    error: Some(format!("{:#}", e)),
                    ..SyncReport::default()
                }
            });
        reports.push(report);
    }
    reports
}

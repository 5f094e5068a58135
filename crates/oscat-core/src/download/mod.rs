//! Fetching catalog artifacts to disk.
//!
//! Bodies are streamed into `<dest>.part` and renamed into place only after a
//! complete 2xx transfer, so a visible artifact is never truncated.

mod sync;

pub use sync::{sync_all, sync_distribution, FileOutcome, FileResult, SyncOptions, SyncReport};

use crate::config::HttpConfig;
use crate::http::default_headers;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix of the in-progress file next to the final destination.
pub const PART_SUFFIX: &str = ".part";

/// Downloads a URL to a local path. [`sync_distribution`] only depends on this
/// trait so the sync logic can run without a network.
pub trait Download {
    /// Writes the body of `url` to `dest`; returns the number of bytes written.
    fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Production [`Download`] using libcurl with the configured timeouts.
#[derive(Debug, Clone, Default)]
pub struct CurlDownloader {
    http: HttpConfig,
}

impl CurlDownloader {
    pub fn new(http: &HttpConfig) -> Self {
        Self { http: http.clone() }
    }
}

impl Download for CurlDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        download_to_file(url, dest, &self.http)
    }
}

/// `dest` with [`PART_SUFFIX`] appended to its file name.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(PART_SUFFIX);
    dest.with_file_name(name)
}

/// Single GET of `url` into `dest`. On any failure the partial file is removed
/// and `dest` is left untouched.
pub fn download_to_file(url: &str, dest: &Path, http: &HttpConfig) -> Result<u64> {
    let part = part_path(dest);
    match transfer(url, &part, http) {
        Ok(written) => {
            fs::rename(&part, dest).with_context(|| {
                format!("rename {} -> {}", part.display(), dest.display())
            })?;
            tracing::info!(url, dest = %dest.display(), bytes = written, "download complete");
            Ok(written)
        }
        Err(e) => {
            if let Err(rm) = fs::remove_file(&part) {
                if rm.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(file = %part.display(), "could not remove partial file: {}", rm);
                }
            }
            Err(e)
        }
    }
}

fn transfer(url: &str, part: &Path, http: &HttpConfig) -> Result<u64> {
    let file = File::create(part)
        .with_context(|| format!("failed to create temp file: {}", part.display()))?;
    let mut out = BufWriter::new(file);
    let mut written: u64 = 0;
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(http.connect_timeout())?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(std::time::Duration::from_secs(60))?;
    easy.timeout(http.download_timeout())?;
    easy.http_headers(default_headers(&http.user_agent)?)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match out.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_error {
        return Err(e).with_context(|| format!("write {}", part.display()));
    }
    performed.with_context(|| format!("GET {} failed", url))?;

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    out.flush().with_context(|| format!("flush {}", part.display()))?;
    out.get_ref()
        .sync_all()
        .with_context(|| format!("sync {}", part.display()))?;
    Ok(written)
}

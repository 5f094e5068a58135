//! `oscat verify` – check a local file against its checksum sources.

use anyhow::Result;
use oscat_core::config::OscatConfig;
use oscat_core::http::CurlFetcher;
use oscat_core::verify::verify_artifact;
use std::path::Path;

pub fn run_verify(
    cfg: &OscatConfig,
    path: &Path,
    checksum_url: Option<&str>,
    checksum: Option<&str>,
) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!("no such file: {}", path.display());
    }
    let fetcher = CurlFetcher::new(&cfg.http);
    let v = verify_artifact(path, checksum_url, checksum, &fetcher);
    println!("{}: {}", path.display(), v.reason);
    if !v.success {
        anyhow::bail!("verification failed for {}", path.display());
    }
    Ok(())
}

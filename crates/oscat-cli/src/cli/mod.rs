//! CLI for the oscat OS-image catalog.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use oscat_core::config;
use std::path::PathBuf;

use commands::{run_checksum, run_download, run_download_all, run_list, run_update, run_verify};

/// Top-level CLI for oscat.
#[derive(Debug, Parser)]
#[command(name = "oscat")]
#[command(
    about = "oscat: build a catalog of OS installation images and verify downloads",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Crawl every configured source and write the catalog.
    Update {
        /// Source configuration (JSON with a top-level `sources` array).
        #[arg(long, default_value = "sources_config.json")]
        config: PathBuf,
        /// Where to write the catalog.
        #[arg(long, default_value = "distributions.json")]
        output: PathBuf,
        /// Indent the catalog JSON.
        #[arg(long)]
        pretty: bool,
        /// Print the catalog to stdout instead of writing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// List catalog entries grouped by distribution.
    List {
        #[arg(long, default_value = "distributions.json")]
        catalog: PathBuf,
        /// Case-insensitive substring of the distribution name.
        #[arg(long)]
        filter_name: Option<String>,
        /// Exact type (linux, windows, ...), case-insensitive.
        #[arg(long)]
        filter_type: Option<String>,
    },

    /// Download (and verify) every artifact of one distribution.
    Download {
        /// Distribution name, case-insensitive.
        name: String,
        #[arg(long, default_value = "distributions.json")]
        catalog: PathBuf,
        /// Root of the download tree (default: current directory).
        #[arg(long)]
        download_dir: Option<PathBuf>,
        /// Skip checksum verification.
        #[arg(long)]
        no_verify: bool,
    },

    /// Download (and verify) every distribution in the catalog.
    DownloadAll {
        #[arg(long, default_value = "distributions.json")]
        catalog: PathBuf,
        #[arg(long)]
        download_dir: Option<PathBuf>,
        #[arg(long)]
        no_verify: bool,
    },

    /// Verify a local file against a checksum manifest and/or a known checksum.
    Verify {
        /// Path to the file.
        path: PathBuf,
        /// URL of a SHA256SUMS-style manifest.
        #[arg(long)]
        checksum_url: Option<String>,
        /// Expected SHA-256 in hex.
        #[arg(long)]
        checksum: Option<String>,
    },

    /// Compute SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

fn download_root(download_dir: Option<PathBuf>) -> Result<PathBuf> {
    match download_dir {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Update {
                config: sources,
                output,
                pretty,
                dry_run,
            } => run_update(&cfg, &sources, &output, pretty, dry_run)?,
            CliCommand::List {
                catalog,
                filter_name,
                filter_type,
            } => run_list(&catalog, filter_name.as_deref(), filter_type.as_deref())?,
            CliCommand::Download {
                name,
                catalog,
                download_dir,
                no_verify,
            } => {
                let root = download_root(download_dir)?;
                run_download(&cfg, &catalog, &name, &root, !no_verify)?;
            }
            CliCommand::DownloadAll {
                catalog,
                download_dir,
                no_verify,
            } => {
                let root = download_root(download_dir)?;
                run_download_all(&cfg, &catalog, &root, !no_verify)?;
            }
            CliCommand::Verify {
                path,
                checksum_url,
                checksum,
            } => run_verify(&cfg, &path, checksum_url.as_deref(), checksum.as_deref())?,
            CliCommand::Checksum { path } => run_checksum(&path)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

//! Tests for update, list, verify and checksum subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_update_defaults() {
    match parse(&["oscat", "update"]) {
        CliCommand::Update {
            config,
            output,
            pretty,
            dry_run,
        } => {
            assert_eq!(config, Path::new("sources_config.json"));
            assert_eq!(output, Path::new("distributions.json"));
            assert!(!pretty);
            assert!(!dry_run);
        }
        _ => panic!("expected Update"),
    }
}

#[test]
fn cli_parse_update_flags() {
    match parse(&[
        "oscat",
        "update",
        "--config",
        "/etc/oscat/sources.json",
        "--output",
        "out.json",
        "--pretty",
        "--dry-run",
    ]) {
        CliCommand::Update {
            config,
            output,
            pretty,
            dry_run,
        } => {
            assert_eq!(config, Path::new("/etc/oscat/sources.json"));
            assert_eq!(output, Path::new("out.json"));
            assert!(pretty);
            assert!(dry_run);
        }
        _ => panic!("expected Update with flags"),
    }
}

#[test]
fn cli_parse_list_filters() {
    match parse(&["oscat", "list", "--filter-name", "ubuntu", "--filter-type", "linux"]) {
        CliCommand::List {
            catalog,
            filter_name,
            filter_type,
        } => {
            assert_eq!(catalog, Path::new("distributions.json"));
            assert_eq!(filter_name.as_deref(), Some("ubuntu"));
            assert_eq!(filter_type.as_deref(), Some("linux"));
        }
        _ => panic!("expected List"),
    }
}

#[test]
fn cli_parse_verify() {
    match parse(&[
        "oscat",
        "verify",
        "debian.iso",
        "--checksum-url",
        "https://m/SHA256SUMS",
    ]) {
        CliCommand::Verify {
            path,
            checksum_url,
            checksum,
        } => {
            assert_eq!(path, Path::new("debian.iso"));
            assert_eq!(checksum_url.as_deref(), Some("https://m/SHA256SUMS"));
            assert!(checksum.is_none());
        }
        _ => panic!("expected Verify"),
    }
}

#[test]
fn cli_parse_checksum() {
    match parse(&["oscat", "checksum", "/tmp/file.iso"]) {
        CliCommand::Checksum { path } => assert_eq!(path, Path::new("/tmp/file.iso")),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["oscat", "bench", "https://x"]).is_err());
}

//! Core of `oscat`: builds a catalog of OS installation images from mirror
//! listings and verifies downloaded images against their published checksums.

pub mod catalog;
pub mod checksum;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod http;
pub mod logging;
pub mod manifest;
pub mod resolver;
pub mod source;
pub mod template;
pub mod url_model;
pub mod verify;

/// Default User-Agent for every request.
pub const USER_AGENT: &str = concat!("oscat/", env!("CARGO_PKG_VERSION"));

//! Integrity verification of a local artifact against its checksum sources.
//!
//! Sources are tried in priority order: the remote manifest, then the
//! checksum stored in the catalog. Having no source at all is reported as a
//! distinct "skipped" success, never as a pass.

use crate::checksum::sha256_path;
use crate::http::Fetch;
use crate::manifest::resolve_checksum;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Why a verification ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerifyReason {
    UrlVerified,
    StoredVerified,
    SkippedNoSource,
    Failed,
}

impl VerifyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            VerifyReason::UrlVerified => "url-verified",
            VerifyReason::StoredVerified => "stored-verified",
            VerifyReason::SkippedNoSource => "skipped-no-source",
            VerifyReason::Failed => "failed",
        }
    }
}

impl fmt::Display for VerifyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one artifact check. The caller decides whether to re-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub success: bool,
    pub reason: VerifyReason,
}

impl Verification {
    fn pass(reason: VerifyReason) -> Self {
        Self {
            success: true,
            reason,
        }
    }

    fn failed() -> Self {
        Self {
            success: false,
            reason: VerifyReason::Failed,
        }
    }
}

/// Digest of the file, computed on first use only.
struct LazyDigest<'a> {
    path: &'a Path,
    value: Option<Option<String>>,
}

impl<'a> LazyDigest<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, value: None }
    }

    /// `None` if the file could not be read; that never equals a checksum.
    fn get(&mut self) -> Option<&str> {
        let path = self.path;
        self.value
            .get_or_insert_with(|| match sha256_path(path) {
                Ok(d) => Some(d),
                Err(e) => {
                    tracing::warn!("checksum computation failed: {:#}", e);
                    None
                }
            })
            .as_deref()
    }

    fn matches(&mut self, expected: &str) -> bool {
        self.get()
            .is_some_and(|actual| actual.eq_ignore_ascii_case(expected.trim()))
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Verifies `path` against an optional manifest URL and an optional stored checksum.
pub fn verify_artifact(
    path: &Path,
    checksum_url: Option<&str>,
    stored_checksum: Option<&str>,
    fetcher: &dyn Fetch,
) -> Verification {
    let checksum_url = non_empty(checksum_url);
    let stored_checksum = non_empty(stored_checksum);
    let mut digest = LazyDigest::new(path);

    if let Some(url) = checksum_url {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::debug!(url, %filename, "looking up checksum manifest");
        if let Some(expected) = resolve_checksum(fetcher, url, &filename) {
            if digest.matches(&expected) {
                return Verification::pass(VerifyReason::UrlVerified);
            }
            tracing::warn!(file = %path.display(), "manifest checksum mismatch");
        }
    }

    if let Some(expected) = stored_checksum {
        if digest.matches(expected) {
            return Verification::pass(VerifyReason::StoredVerified);
        }
        tracing::warn!(file = %path.display(), "stored checksum mismatch");
    }

    if checksum_url.is_none() && stored_checksum.is_none() {
        tracing::warn!(file = %path.display(), "no checksum source available, skipping verification");
        return Verification::pass(VerifyReason::SkippedNoSource);
    }

    Verification::failed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::stub::StubFetcher;
    use std::io::Write;

    // sha256("hello\n")
    const HELLO: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";
    const WRONG: &str = "0000000000000000000000000000000000000000000000000000000000000000";
    const MANIFEST_URL: &str = "https://mirror.example/SHA256SUMS";

    fn artifact() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distro.iso");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"hello\n").unwrap();
        (dir, path)
    }

    #[test]
    fn manifest_match_is_url_verified() {
        let (_dir, path) = artifact();
        let fetcher = StubFetcher::new().page(MANIFEST_URL, &format!("{HELLO}  distro.iso\n"));
        let v = verify_artifact(&path, Some(MANIFEST_URL), Some(WRONG), &fetcher);
        assert_eq!(v, Verification::pass(VerifyReason::UrlVerified));
    }

    #[test]
    fn manifest_mismatch_falls_through_to_stored() {
        let (_dir, path) = artifact();
        let fetcher = StubFetcher::new().page(MANIFEST_URL, &format!("{WRONG}  distro.iso\n"));
        let v = verify_artifact(&path, Some(MANIFEST_URL), Some(HELLO), &fetcher);
        assert!(v.success);
        assert_eq!(v.reason, VerifyReason::StoredVerified);
    }

    #[test]
    fn no_source_is_skipped_not_verified() {
        let (_dir, path) = artifact();
        let fetcher = StubFetcher::new();
        let v = verify_artifact(&path, None, Some(""), &fetcher);
        assert!(v.success);
        assert_eq!(v.reason, VerifyReason::SkippedNoSource);
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[test]
    fn both_mismatched_fails() {
        let (_dir, path) = artifact();
        let fetcher = StubFetcher::new().page(MANIFEST_URL, &format!("{WRONG}  distro.iso\n"));
        let v = verify_artifact(&path, Some(MANIFEST_URL), Some(WRONG), &fetcher);
        assert_eq!(v, Verification::failed());
    }

    #[test]
    fn unreachable_manifest_without_stored_fails() {
        let (_dir, path) = artifact();
        let fetcher = StubFetcher::new();
        let v = verify_artifact(&path, Some(MANIFEST_URL), None, &fetcher);
        assert_eq!(v.reason, VerifyReason::Failed);
        assert!(!v.success);
    }

    #[test]
    fn stored_checksum_case_insensitive() {
        let (_dir, path) = artifact();
        let v = verify_artifact(&path, None, Some(&HELLO.to_uppercase()), &StubFetcher::new());
        assert_eq!(v.reason, VerifyReason::StoredVerified);
    }

    #[test]
    fn missing_file_fails_when_source_present() {
        let dir = tempfile::tempdir().unwrap();
        let v = verify_artifact(&dir.path().join("gone.iso"), None, Some(HELLO), &StubFetcher::new());
        assert_eq!(v.reason, VerifyReason::Failed);
    }

    #[test]
    fn reason_strings() {
        assert_eq!(VerifyReason::UrlVerified.to_string(), "url-verified");
        assert_eq!(VerifyReason::SkippedNoSource.as_str(), "skipped-no-source");
    }
}

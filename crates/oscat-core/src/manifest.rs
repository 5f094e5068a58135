//! Checksum manifests (SHA256SUMS, CHECKSUM, ...) and extraction of one file's digest.
//!
//! Manifests may be clear-signed. The signature envelope is removed
//! textually; it is not validated.

use crate::checksum::is_sha256_hex;
use crate::http::Fetch;

const SIGNED_MESSAGE_MARKER: &str = "-----BEGIN PGP SIGNED MESSAGE-----";
const SIGNATURE_MARKER: &str = "-----BEGIN PGP SIGNATURE-----";

/// Returns the text to search: the clear-signed body when a wrapper is
/// present (without `Hash:` header lines), otherwise the whole document.
pub fn search_body(text: &str) -> String {
    let mut in_signed = false;
    let mut found_wrapper = false;
    let mut body: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(SIGNED_MESSAGE_MARKER) {
            in_signed = true;
            found_wrapper = true;
            continue;
        }
        if trimmed.starts_with(SIGNATURE_MARKER) {
            break;
        }
        if in_signed && !trimmed.is_empty() && !trimmed.starts_with("Hash:") {
            body.push(trimmed);
        }
    }

    if found_wrapper && !body.is_empty() {
        body.join("\n")
    } else {
        text.to_string()
    }
}

/// Candidate from `<checksum> <filename...>` (GNU coreutils style).
fn gnu_candidate(line: &str) -> Option<&str> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    parts.next()?;
    Some(first)
}

/// Candidate from `SHA256 (<filename>) = <checksum>` (BSD tag style).
fn bsd_candidate(line: &str) -> Option<&str> {
    if !line.contains("SHA256") {
        return None;
    }
    line.rsplit_once('=').map(|(_, checksum)| checksum.trim())
}

/// Finds the SHA-256 for `filename` in manifest `text`, lowercased.
pub fn find_checksum(text: &str, filename: &str) -> Option<String> {
    if filename.is_empty() {
        return None;
    }
    let body = search_body(text);
    body.lines()
        .filter(|line| line.contains(filename))
        .find_map(|line| {
            [gnu_candidate(line), bsd_candidate(line)]
                .into_iter()
                .flatten()
                .find(|c| is_sha256_hex(c))
        })
        .map(str::to_ascii_lowercase)
}

/// Fetches the manifest at `url` and looks up `filename`.
///
/// A failed fetch is logged and reported as "not found".
pub fn resolve_checksum(fetcher: &dyn Fetch, url: &str, filename: &str) -> Option<String> {
    let text = match fetcher.fetch_text(url) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!("failed to fetch checksum manifest: {}", e);
            return None;
        }
    };
    let found = find_checksum(&text, filename);
    if found.is_none() {
        tracing::debug!(url, filename, "no checksum line for file in manifest");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::stub::StubFetcher;

    const HEX: &str = "0a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f9";

    #[test]
    fn plain_gnu_line() {
        let text = format!("{HEX} distro.iso\n");
        assert_eq!(find_checksum(&text, "distro.iso").as_deref(), Some(HEX));
    }

    #[test]
    fn binary_marker_and_other_files() {
        let other = "f".repeat(64);
        let text = format!("{other} *other.iso\n{HEX} *distro.iso\n");
        assert_eq!(find_checksum(&text, "distro.iso").as_deref(), Some(HEX));
    }

    #[test]
    fn clear_signed_returns_same_checksum() {
        let text = format!(
            "-----BEGIN PGP SIGNED MESSAGE-----\n\
             Hash: SHA256\n\
             \n\
             {HEX} distro.iso\n\
             -----BEGIN PGP SIGNATURE-----\n\
             iQIzBAEBCAAdFiEE\n\
             -----END PGP SIGNATURE-----\n"
        );
        assert_eq!(find_checksum(&text, "distro.iso").as_deref(), Some(HEX));
        let body = search_body(&text);
        assert!(!body.contains("BEGIN PGP"));
        assert!(!body.contains("Hash:"));
        assert!(!body.contains("iQIzBAEBCAAdFiEE"));
    }

    #[test]
    fn signature_block_lines_are_not_searched() {
        // The only line naming the file sits inside the signature block.
        let text = format!(
            "-----BEGIN PGP SIGNED MESSAGE-----\n\
             Hash: SHA256\n\
             \n\
             {HEX} other.iso\n\
             -----BEGIN PGP SIGNATURE-----\n\
             {HEX} distro.iso\n\
             -----END PGP SIGNATURE-----\n"
        );
        assert_eq!(find_checksum(&text, "distro.iso"), None);
    }

    #[test]
    fn bsd_tag_line_uppercase_normalized() {
        let upper = HEX.to_ascii_uppercase();
        let text = format!("# Fedora-Workstation\nSHA256 (Fedora-40.iso) = {upper}\n");
        assert_eq!(find_checksum(&text, "Fedora-40.iso").as_deref(), Some(HEX));
    }

    #[test]
    fn invalid_candidates_rejected() {
        let text = "abc123 distro.iso\nSHA256 (distro.iso) = nothex\n";
        assert_eq!(find_checksum(text, "distro.iso"), None);
        assert_eq!(find_checksum(&format!("{HEX} distro.iso"), "missing.iso"), None);
        assert_eq!(find_checksum(&format!("{HEX} distro.iso"), ""), None);
    }

    #[test]
    fn fetch_failure_is_not_found() {
        let fetcher = StubFetcher::new();
        assert_eq!(resolve_checksum(&fetcher, "https://m/SHA256SUMS", "a.iso"), None);
    }

    #[test]
    fn resolve_via_fetcher() {
        let fetcher =
            StubFetcher::new().page("https://m/SHA256SUMS", &format!("{HEX}  a.iso\n"));
        assert_eq!(
            resolve_checksum(&fetcher, "https://m/SHA256SUMS", "a.iso").as_deref(),
            Some(HEX)
        );
    }
}

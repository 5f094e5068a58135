//! SHA-256 digests of downloaded artifacts.
//!
//! Files are hashed in fixed-size chunks so multi-gigabyte images never sit
//! in memory.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Length of a hex-encoded SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// True if `s` is exactly 64 hexadecimal characters (either case).
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == SHA256_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Compute SHA-256 of everything `reader` yields, as lowercase hex.
pub fn sha256_reader<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    sha256_reader(f).with_context(|| format!("read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn known_digests() {
        assert_eq!(sha256_reader(&b""[..]).unwrap(), EMPTY);
        assert_eq!(
            sha256_reader(&b"hello\n"[..]).unwrap(),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn reader_spans_chunks() {
        let data = vec![b'a'; BUF_SIZE * 2 + 17];
        let streamed = sha256_reader(&data[..]).unwrap();
        assert_eq!(streamed, hex::encode(Sha256::digest(&data)));
    }

    #[test]
    fn path_digest_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let iso = dir.path().join("empty.iso");
        std::fs::write(&iso, b"").unwrap();
        assert_eq!(sha256_path(&iso).unwrap(), EMPTY);
        let err = sha256_path(&dir.path().join("gone.iso")).unwrap_err();
        assert!(format!("{err:#}").contains("gone.iso"));
    }

    #[test]
    fn hex_validation() {
        assert!(is_sha256_hex(&"A".repeat(SHA256_HEX_LEN)));
        assert!(!is_sha256_hex(&"a".repeat(63)));
        assert!(!is_sha256_hex(&"g".repeat(SHA256_HEX_LEN)));
    }
}

//! Local filenames for catalog entries.
//!
//! An artifact is stored under the last path segment of its download URL so
//! the name matches the entry in the mirror's checksum manifest.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename_for_linux;

/// Filename to store `download_url` under, or `None` if the URL has no usable path segment.
pub fn local_filename(download_url: &str) -> Option<String> {
    let raw = filename_from_url_path(download_url)?;
    let sanitized = sanitize_filename_for_linux(&raw);
    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_filename_from_url_path() {
        assert_eq!(
            local_filename("https://releases.ubuntu.com/24.04/ubuntu-24.04-desktop-amd64.iso")
                .as_deref(),
            Some("ubuntu-24.04-desktop-amd64.iso")
        );
        assert_eq!(
            local_filename("https://cdn.example.com/path/to/debian-12.iso?mirror=1").as_deref(),
            Some("debian-12.iso")
        );
    }

    #[test]
    fn local_filename_none_for_root() {
        assert_eq!(local_filename("https://example.com/"), None);
        assert_eq!(local_filename("not a url"), None);
    }
}

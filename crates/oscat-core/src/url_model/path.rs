//! Last path segment of a download URL.

/// Returns the final segment of the URL path, ignoring the query and fragment.
///
/// A URL whose path ends in `/` names a directory, not a file, and yields
/// `None`, as do unparseable URLs and `.`/`..` segments.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    match segment {
        "" | "." | ".." => None,
        s => Some(s.to_string()),
    }
}

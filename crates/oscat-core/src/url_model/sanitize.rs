//! Linux-safe local filenames for downloaded artifacts.

/// Replaces characters that cannot appear in a Linux filename.
///
/// NUL, `/`, `\` and control characters become `_`; leading dots and
/// surrounding whitespace are trimmed so the result is never hidden or
/// a path component like `..`. Anything else is kept as-is, because the
/// name must still match the line in the checksum manifest.
pub fn sanitize_filename_for_linux(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim().trim_start_matches('.');

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}

//! Filename hints from the URL path.

/// Longest file extension accepted, in ASCII alphanumerics.
pub(super) const MAX_EXTENSION_LEN: usize = 10;

/// Extracts the last non-empty path segment from a URL.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
/// The segment is returned as it appears in the URL (not percent-decoded).
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Returns the lower-cased trailing `.ext` of the URL path, if any.
pub fn path_extension(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    extension_of(parsed.path()).map(|ext| ext.to_ascii_lowercase())
}

/// Returns the trailing extension of `name` (without the dot) when it is
/// 1 to 10 ASCII alphanumerics.
pub(super) fn extension_of(name: &str) -> Option<&str> {
    let (_, ext) = name.rsplit_once('.')?;
    is_extension_token(ext).then_some(ext)
}

/// Removes a trailing `.ext` (1 to 10 ASCII alphanumerics) from `name`.
pub fn strip_extension(name: &str) -> &str {
    match extension_of(name) {
        Some(ext) => &name[..name.len() - ext.len() - 1],
        None => name,
    }
}

pub(super) fn is_extension_token(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_EXTENSION_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

use url::Url;

/// Makes a string safe to use as a single file name component
///
/// Path separators, characters reserved on Windows and control characters become
/// `_`; trailing dots and spaces are trimmed. Never returns an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim().trim_end_matches(['.', ' ']);

    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// File name of the last path segment of a URL, sanitized
///
/// Falls back to `fallback` when the URL has no usable segment.
pub fn filename_from_url(url: &Url, fallback: &str) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(sanitize_filename)
        .unwrap_or_else(|| sanitize_filename(fallback))
}

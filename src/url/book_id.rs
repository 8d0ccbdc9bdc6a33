use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// Identifier of a book on the site
///
/// Detail links look like `https://tululu.org/b239/`; the identifier is the token
/// after the leading `b` of the last non-empty path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookId(String);

impl BookId {
    /// Parses the identifier out of a book detail URL
    ///
    /// # Example
    ///
    /// ```
    /// use tululu_fetch::url::BookId;
    ///
    /// let id = BookId::from_url("https://tululu.org/b239/").unwrap();
    /// assert_eq!(id.as_str(), "239");
    /// ```
    pub fn from_url(link: &str) -> UrlResult<Self> {
        let url = Url::parse(link).map_err(|e| UrlError::Parse(format!("{}: {}", link, e)))?;

        let segment = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .ok_or_else(|| UrlError::MissingBookId(link.to_string()))?;

        Self::from_segment(segment).ok_or_else(|| UrlError::MissingBookId(link.to_string()))
    }

    fn from_segment(segment: &str) -> Option<Self> {
        let token = segment.strip_prefix('b')?;
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Value stored instead of a path when an asset was skipped
pub const NOT_DOWNLOADED: &str = "Not downloaded";

/// Where a downloaded asset was saved, or that it was not downloaded at all
///
/// Serialized as a plain string: the path, or the `"Not downloaded"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetLocation {
    Saved(PathBuf),
    NotDownloaded,
}

impl AssetLocation {
    /// The destination path, if the asset is downloaded
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Saved(path) => Some(path),
            Self::NotDownloaded => None,
        }
    }
}

impl From<String> for AssetLocation {
    fn from(value: String) -> Self {
        if value == NOT_DOWNLOADED {
            Self::NotDownloaded
        } else {
            Self::Saved(PathBuf::from(value))
        }
    }
}

impl From<AssetLocation> for String {
    fn from(value: AssetLocation) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AssetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(path) => write!(f, "{}", path.display()),
            Self::NotDownloaded => f.write_str(NOT_DOWNLOADED),
        }
    }
}

/// Metadata of one fetched book, as written to `books_description.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "book_name")]
    pub name: String,
    pub author: String,
    #[serde(rename = "img_path")]
    pub image: AssetLocation,
    #[serde(rename = "book_path")]
    pub text: AssetLocation,
    pub comments: Vec<String>,
    #[serde(rename = "genre")]
    pub genres: Vec<String>,
}

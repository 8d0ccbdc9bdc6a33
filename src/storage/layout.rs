use crate::config::{CrawlerConfig, OutputConfig};
use crate::storage::filename::{filename_from_url, sanitize_filename};
use crate::storage::AssetLocation;
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// Name of the aggregate JSON file
pub const DESCRIPTION_FILE: &str = "books_description.json";

/// Destination folders and naming policy for one run
///
/// ```text
/// <dest>/books/<name>.txt
/// <dest>/images/<cover file name>
/// <json>/books_description.json      (json defaults to <dest>/json)
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    books_dir: PathBuf,
    images_dir: PathBuf,
    json_dir: PathBuf,
    skip_texts: bool,
    skip_images: bool,
    /// Prefix added to every saved file name, when the timestamp policy is on
    prefix: Option<String>,
}

impl OutputLayout {
    /// Builds the layout from the output and crawler configuration
    ///
    /// `started_at` is used for the timestamp prefix so all files of a run share it.
    pub fn new(
        output: &OutputConfig,
        crawler: &CrawlerConfig,
        started_at: DateTime<Local>,
    ) -> Self {
        let dest = &output.dest_folder;
        let json_dir = output
            .json_folder
            .clone()
            .unwrap_or_else(|| dest.join("json"));

        let prefix = output
            .timestamp_filenames
            .then(|| format!("{} - ", started_at.format("%Y-%m-%d_%H-%M-%S")));

        Self {
            books_dir: dest.join("books"),
            images_dir: dest.join("images"),
            json_dir,
            skip_texts: crawler.skip_texts,
            skip_images: crawler.skip_images,
            prefix,
        }
    }

    /// Creates the output folders if they do not exist yet
    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.books_dir)?;
        fs::create_dir_all(&self.images_dir)?;
        fs::create_dir_all(&self.json_dir)?;
        Ok(())
    }

    pub fn books_dir(&self) -> &Path {
        &self.books_dir
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn json_dir(&self) -> &Path {
        &self.json_dir
    }

    /// Path of the aggregate JSON file
    pub fn description_path(&self) -> PathBuf {
        self.json_dir.join(DESCRIPTION_FILE)
    }

    /// Where the text of a book with this (already sanitized) name goes
    pub fn text_location(&self, book_name: &str) -> AssetLocation {
        if self.skip_texts {
            return AssetLocation::NotDownloaded;
        }
        let filename = format!("{}.txt", sanitize_filename(book_name));
        AssetLocation::Saved(self.books_dir.join(self.prefixed(&filename)))
    }

    /// Where the cover downloaded from `cover_url` goes
    pub fn image_location(&self, cover_url: &Url) -> AssetLocation {
        if self.skip_images {
            return AssetLocation::NotDownloaded;
        }
        let filename = filename_from_url(cover_url, "cover.jpg");
        AssetLocation::Saved(self.images_dir.join(self.prefixed(&filename)))
    }

    fn prefixed(&self, filename: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, filename),
            None => filename.to_string(),
        }
    }
}

/// Writes a book text as UTF-8, replacing any existing file
pub fn write_text(path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, text.as_bytes())
}

/// Writes image bytes, replacing any existing file
pub fn write_image(path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::write(path, bytes)
}

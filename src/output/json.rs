//! JSON description output

use crate::output::traits::{OutputHandler, OutputResult};
use crate::storage::BookRecord;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes the records as a JSON array to a single file
///
/// The output is UTF-8 with non-ASCII characters left unescaped. An existing
/// file is replaced.
#[derive(Debug, Clone)]
pub struct JsonOutputHandler {
    path: PathBuf,
}

impl JsonOutputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl OutputHandler for JsonOutputHandler {
    fn write_books(&self, records: &[BookRecord]) -> OutputResult<PathBuf> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} book descriptions to {}",
            records.len(),
            self.path.display()
        );
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AssetLocation;
    use tempfile::TempDir;

    fn record(name: &str) -> BookRecord {
        BookRecord {
            name: name.to_string(),
            author: "Беляев Александр".to_string(),
            image: AssetLocation::NotDownloaded,
            text: AssetLocation::Saved(PathBuf::from(format!("books/{}.txt", name))),
            comments: vec![],
            genres: vec!["Научная фантастика".to_string()],
        }
    }

    #[test]
    fn test_writes_array_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("json").join("books_description.json");
        let handler = JsonOutputHandler::new(&path);

        let written = handler
            .write_books(&[record("Человек-амфибия"), record("Голова профессора Доуэля")])
            .unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Человек-амфибия"));
        assert!(content.contains("\"img_path\": \"Not downloaded\""));

        let parsed: Vec<BookRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Человек-амфибия");
        assert_eq!(parsed[1].name, "Голова профессора Доуэля");
        assert_eq!(parsed[0].image, AssetLocation::NotDownloaded);
    }

    #[test]
    fn test_empty_aggregate_is_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books_description.json");
        JsonOutputHandler::new(&path).write_books(&[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_overwrites_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books_description.json");
        let handler = JsonOutputHandler::new(&path);

        handler.write_books(&[record("Ариэль"), record("Прыжок в ничто")]).unwrap();
        handler.write_books(&[record("Ариэль")]).unwrap();

        let parsed: Vec<BookRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::models::Book;

/// Failures at the persistence boundary. Malformed content is kept separate
/// from I/O problems because the loader recovers from it with an empty catalog.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read library file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("library file {path} is not a valid book list")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write library file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize library")]
    Serialize(#[source] serde_json::Error),
}

/// Whole-file JSON store for the book list.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every book from disk. A missing file is an empty library.
    pub fn load(&self) -> Result<Vec<Book>, StoreError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no library file yet, starting empty");
            return Ok(Vec::new());
        }

        let raw = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        // Invalid UTF-8 surfaces here as a parse error, not an I/O one.
        let books: Vec<Book> =
            serde_json::from_slice(&raw).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        info!(path = %self.path.display(), count = books.len(), "library loaded");
        Ok(books)
    }

    /// Overwrite the file with the full list. The parent directory is created
    /// on first save; the previous contents are not kept.
    pub fn save(&self, books: &[Book]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let payload = serde_json::to_string_pretty(books).map_err(StoreError::Serialize)?;
        fs::write(&self.path, payload).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), count = books.len(), "library saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Book> {
        vec![
            Book::new("The Art of War", "Sun Tzu", 500, "Strategy", true),
            Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", false),
        ]
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("library.json"));

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("library.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("nested").join("library.json"));

        store.save(&sample()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("library.json"));

        store.save(&sample()).unwrap();
        store.save(&sample()[..1]).unwrap();

        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "{ not json").unwrap();
        let store = Store::new(&path);

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        // The file is left alone.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, [0xff, 0xfe, b'[', b']']).unwrap();

        let err = Store::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn null_values_read_as_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(
            &path,
            r#"[{"title": "Dune", "author": null, "year": null, "genre": "Sci-Fi", "read": null},
                {"title": "Emma", "read": true}]"#,
        )
        .unwrap();

        let books = Store::new(&path).load().unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0], Book::new("Dune", "", 0, "Sci-Fi", false));
        assert!(books[1].read);
    }

    #[test]
    fn reads_files_with_missing_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, r#"[{"title": "Emma", "author": "Jane Austen", "year": 1815}]"#)
            .unwrap();

        let books = Store::new(&path).load().unwrap();
        assert_eq!(books.len(), 1);
        assert!(!books[0].read);
        assert_eq!(books[0].genre, "");
    }
}

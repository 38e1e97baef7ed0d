use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".book-library";
/// JSON file holding the saved library.
const LIBRARY_FILE_NAME: &str = "library.json";
/// Subfolder for the rolling log files.
const LOG_DIR_NAME: &str = "logs";

/// Where the application keeps its files. There are no flags or environment
/// overrides; everything lives under one data directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub library_path: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    /// Resolve the default layout inside the user's home directory.
    pub fn resolve() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::with_data_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Build the layout rooted at an arbitrary directory.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            library_path: data_dir.join(LIBRARY_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            data_dir,
        }
    }
}

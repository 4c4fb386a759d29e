//! Filesystem adapter: local-disk implementation of the
//! [`FileStore`](crate::ports::FileStore) port.

use crate::error::ConvertError;
use crate::ports::FileStore;
use std::path::{Path, PathBuf};

/// Local file I/O behind the port interface.
#[derive(Debug, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for LocalFileStore {
    fn read_file(&self, path: &Path) -> Result<String, ConvertError> {
        // Distinguish "not there" from "there but unreadable" before opening,
        // mirroring the service's error taxonomy.
        if !path.exists() {
            return Err(ConvertError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        std::fs::read_to_string(path).map_err(|e| ConvertError::FileAccess {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn save_file(&self, path: &Path, bytes: &[u8]) -> Result<PathBuf, ConvertError> {
        std::fs::write(path, bytes).map_err(|e| ConvertError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
    }

    fn list_files(&self, dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, ConvertError> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(dir).map_err(|e| ConvertError::FileAccess {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let wanted: Vec<String> = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| wanted.iter().any(|w| w == &e.to_ascii_lowercase()))
                    .unwrap_or(false)
            })
            .collect();

        // read_dir order is platform-dependent; sort for deterministic batches.
        files.sort();
        Ok(files)
    }
}

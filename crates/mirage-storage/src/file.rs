//! JSON-file storage: one `<key>.json` file per key under a directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mirage_types::error::{MirageError, Result};

use crate::Storage;

/// Durable storage backed by a directory of JSON files.
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        log::debug!("File storage at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(MirageError::Storage(format!("invalid key: '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn store(&mut self, key: &str, value: &serde_json::Value) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(value)?;
        fs::write(&tmp, text)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            log::warn!("Failed to commit {}: {e}", path.display());
            // The rename error is the one reported.
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

//! In-memory storage implementation.
//!
//! Useful for unit tests and ephemeral sessions. Values are kept as
//! serialized JSON text, so every `retrieve` hands back a fresh copy the
//! way a browser's local storage does.

use std::collections::BTreeMap;

use mirage_types::error::{MirageError, Result};

use crate::Storage;

/// A fully in-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `store` fail, simulating a full or locked medium.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn store(&mut self, key: &str, value: &serde_json::Value) -> Result<()> {
        if self.read_only {
            return Err(MirageError::Storage(format!("read-only: cannot store '{key}'")));
        }
        let text = serde_json::to_string(value)?;
        self.entries.insert(key.to_string(), text);
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<serde_json::Value>> {
        match self.entries.get(key) {
            Some(text) => Ok(Some(serde_json::from_str(text)?)),
            None => Ok(None),
        }
    }
}

//! Key-value storage for the mirage terminal.
//!
//! The engine persists its configuration and command data (notes) as JSON
//! snapshots keyed by name. Every backend implements [`Storage`]; the
//! engine never touches the underlying medium directly.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use mirage_types::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A durable key-value store of JSON values.
pub trait Storage {
    /// Persist `value` under `key`, replacing any previous value.
    ///
    /// The write is complete when this returns `Ok`.
    fn store(&mut self, key: &str, value: &serde_json::Value) -> Result<()>;

    /// Load the value stored under `key`, or `None` if absent.
    fn retrieve(&self, key: &str) -> Result<Option<serde_json::Value>>;
}

impl dyn Storage + '_ {
    /// Serialize `value` and store it under `key`.
    pub fn store_as<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_value(value)?;
        self.store(key, &json)
    }

    /// Retrieve the value under `key` and deserialize it.
    pub fn retrieve_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.retrieve(key)? {
            Some(json) => Ok(Some(serde_json::from_value(json)?)),
            None => Ok(None),
        }
    }
}

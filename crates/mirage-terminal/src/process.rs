//! Named background state that outlives the command invocation that created it.
//!
//! A "process" is a cooperative data holder, not an OS process: a command
//! registers a value under a name, and later invocations look it up to
//! resume, replace or stop it. Owners tear their entries down explicitly.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use mirage_types::error::{MirageError, Result};

/// A registered process: a name and its opaque state.
#[derive(Clone)]
pub struct ProcessEntry {
    name: String,
    data: Rc<dyn Any>,
}

impl ProcessEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state, if it has type `T`.
    pub fn data<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.data).downcast::<T>().ok()
    }
}

impl fmt::Debug for ProcessEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of live processes keyed by unique name.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    entries: BTreeMap<String, ProcessEntry>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `data` under `name`. Fails if the name is taken.
    pub fn register(&mut self, name: &str, data: Rc<dyn Any>) -> Result<()> {
        if self.entries.contains_key(name) {
            return Err(MirageError::DuplicateProcess(name.to_string()));
        }
        self.entries.insert(
            name.to_string(),
            ProcessEntry {
                name: name.to_string(),
                data,
            },
        );
        log::debug!("Process '{name}' registered");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<ProcessEntry> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| MirageError::NotFound(format!("process '{name}'")))
    }

    /// Remove an entry, handing it back to the caller for teardown.
    pub fn unregister(&mut self, name: &str) -> Option<ProcessEntry> {
        let removed = self.entries.remove(name);
        if removed.is_some() {
            log::debug!("Process '{name}' unregistered");
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of live processes in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//! Key-value persistence.
//!
//! The engine never touches files or the network. Everything it persists goes
//! through [`KeyValueStore`], a string-to-string map the host provides.

use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Key holding the JSON array of quotes.
pub const QUOTES_KEY: &str = "quotes";

/// Key holding the selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Session key holding the last quote shown.
pub const LAST_QUOTE_KEY: &str = "lastQuote";

/// A string key-value store.
///
/// Implementors must be `Send + Sync` so they can be shared across threads.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Returns `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write (insert or replace) a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store.
///
/// Contents are lost when the process ends, which is exactly what
/// session-scoped storage needs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

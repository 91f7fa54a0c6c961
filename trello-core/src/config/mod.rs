// Flat key/value configuration store

use crate::error::{TrelloError, TrelloResult};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// String-to-string configuration store backed by a flat properties file.
///
/// Holds API credentials, entity display names, and the entity
/// identifiers discovered at runtime (`boardId`, `listId`, `cardId1`,
/// `cardId2`). There is no global instance: the store is an explicit
/// value handed `&mut` into each workflow step, and since steps run
/// strictly sequentially no locking is needed. Last write wins.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    entries: BTreeMap<String, String>,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a properties file: one `key=value` per line, `#` and `!`
    /// comment lines and blank lines ignored, keys and values trimmed.
    /// The value may itself contain `=`.
    pub fn load(path: impl AsRef<Path>) -> TrelloResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TrelloError::Config {
            message: format!("failed to read {}", path.display()),
            source: Some(Box::new(e)),
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse properties text into a store.
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { entries }
    }

    /// Look up a key; fails with `MissingKey` when absent.
    ///
    /// No type conversion, no validation: values are returned verbatim.
    pub fn get(&self, key: &str) -> TrelloResult<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| TrelloError::missing_key(key))
    }

    /// Set a key, silently overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the store back to disk, one `key=value` per line in sorted
    /// key order.
    pub fn persist(&self, path: impl AsRef<Path>) -> TrelloResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_string()).map_err(|e| TrelloError::Config {
            message: format!("failed to write {}", path.display()),
            source: Some(Box::new(e)),
        })
    }
}

impl fmt::Display for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

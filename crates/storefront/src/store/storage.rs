//! Per-browser key/value text storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Durable string storage with the shape of browser local storage.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<&str>;
    fn set_item(&mut self, key: &str, value: String);
    fn remove_item(&mut self, key: &str);
}

/// In-memory storage, serialized as a plain map so it can live in a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.items.insert(key.to_owned(), value);
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

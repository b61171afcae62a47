//! Site content resolver.
//!
//! The site stores editable copy in a flat key/value table. Public pages and
//! admin screens read a snapshot of that table through [`ContentMap`], which
//! never fails: absent keys and malformed JSON degrade to the caller's
//! fallback.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::site_content::{ContentList, TextKey};

/// Snapshot of the whole `site_content` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentMap {
    entries: HashMap<String, String>,
}

impl ContentMap {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Number of keys in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw stored value, if any.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stored value for `key`, or `fallback` if and only if the key is absent.
    ///
    /// An empty stored string is a deliberate edit and is returned as is.
    pub fn get(&self, key: &str, fallback: &str) -> String {
        match self.entries.get(key) {
            Some(value) => value.clone(),
            None => fallback.to_string(),
        }
    }

    /// Resolve a well-known text key against its built-in default.
    pub fn text(&self, key: &TextKey) -> String {
        self.get(key.key, key.default)
    }

    /// Parse the stored value as JSON into `T`.
    ///
    /// Returns `fallback` when the key is absent, the value is not JSON, or
    /// the JSON does not have the shape of `T`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        self.entries
            .get(key)
            .and_then(|raw| serde_json::from_str::<T>(raw).ok())
            .unwrap_or(fallback)
    }

    /// Like [`get_json`](Self::get_json) for lists, also falling back when
    /// the stored list is empty.
    pub fn get_list<T: DeserializeOwned>(&self, key: &str, fallback: Vec<T>) -> Vec<T> {
        let items: Vec<T> = self.get_json(key, Vec::new());
        if items.is_empty() {
            fallback
        } else {
            items
        }
    }

    /// Resolve a typed list key against its built-in defaults.
    pub fn list<T: ContentList>(&self) -> Vec<T> {
        self.get_list(T::KEY, T::defaults())
    }
}

impl FromIterator<(String, String)> for ContentMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

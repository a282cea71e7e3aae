//! Raw string key-value store.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{DbError, Result};

/// String-keyed store of string values behind a reader/writer lock.
#[derive(Debug, Default)]
pub struct KvStore {
    data: RwLock<HashMap<String, String>>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new key. Fails with `KeyExists` if the key is present.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let mut data = self.data.write();
        if data.contains_key(&key) {
            return Err(DbError::KeyExists(key));
        }
        data.insert(key, value.into());
        Ok(())
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Result<String> {
        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| DbError::KeyNotFound(key.to_string()))
    }

    /// Replaces the value of an existing key.
    pub fn update(&self, key: &str, value: impl Into<String>) -> Result<()> {
        match self.data.write().get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(DbError::KeyNotFound(key.to_string())),
        }
    }

    /// Removes a key.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.data
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| DbError::KeyNotFound(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

//! Named storage engines.
//!
//! An engine exposes the table store operations behind a trait object so
//! callers can select an implementation by name from configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::DbConfig;
use crate::database::Database;
use crate::error::{DbError, Result};
use crate::types::{TypeDescriptor, Value};

/// Name of the built-in in-memory engine.
pub const IN_MEMORY: &str = "inmemory";

/// Storage operations shared by all engines.
pub trait StorageEngine: Send + Sync {
    /// Prepares the engine for use, discarding any existing tables.
    fn init(&self) -> Result<()>;

    /// Registers a table for a record type.
    fn create_table(&self, descriptor: TypeDescriptor, primary_key: &str) -> Result<()>;

    /// Inserts a record into the table selected by its type name.
    fn insert(&self, record: Value) -> Result<()>;

    /// Gets a record by table name and key.
    fn get(&self, type_name: &str, key: &str) -> Result<Value>;
}

impl StorageEngine for Database {
    fn init(&self) -> Result<()> {
        self.reset();
        Ok(())
    }

    fn create_table(&self, descriptor: TypeDescriptor, primary_key: &str) -> Result<()> {
        self.create_table_from(descriptor, primary_key)
    }

    fn insert(&self, record: Value) -> Result<()> {
        self.insert_value(record)
    }

    fn get(&self, type_name: &str, key: &str) -> Result<Value> {
        self.get_value(type_name, key)
    }
}

/// Registry of engines by name.
#[derive(Default)]
pub struct EngineRegistry {
    engines: BTreeMap<String, Arc<dyn StorageEngine>>,
}

impl EngineRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the in-memory engine.
    pub fn with_defaults() -> Self {
        Self::with_config(&DbConfig::default())
    }

    /// Creates a registry whose in-memory engine uses `config`.
    pub fn with_config(config: &DbConfig) -> Self {
        let mut registry = Self::new();
        registry.register(IN_MEMORY, Arc::new(Database::with_config(config.clone())));
        registry
    }

    /// Registers an engine, replacing any engine with the same name.
    pub fn register(&mut self, name: impl Into<String>, engine: Arc<dyn StorageEngine>) {
        self.engines.insert(name.into(), engine);
    }

    /// Looks up an engine by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn StorageEngine>> {
        self.engines
            .get(name)
            .cloned()
            .ok_or_else(|| DbError::UnknownEngine(name.to_string()))
    }

    /// Registered engine names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.engines.keys().map(String::as_str).collect()
    }

    /// Returns the engine named by the configuration, initialised.
    pub fn open(&self, config: &DbConfig) -> Result<Arc<dyn StorageEngine>> {
        let engine = self.get(&config.engine)?;
        engine.init()?;
        tracing::debug!(engine = %config.engine, "Selected storage engine");
        Ok(engine)
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.names())
            .finish()
    }
}

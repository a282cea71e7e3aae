//! Database container managing record tables.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::codec::Codec;
use crate::config::DbConfig;
use crate::error::{DbError, Result};
use crate::record::Record;
use crate::table::Table;
use crate::types::{TypeDescriptor, Value};

/// Database container holding all tables.
#[derive(Debug)]
pub struct Database {
    /// Map of table name to table instance
    tables: RwLock<HashMap<String, Arc<Table>>>,
    config: DbConfig,
    codec: Codec,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates a new empty database with default configuration.
    pub fn new() -> Self {
        Self::with_config(DbConfig::default())
    }

    /// Creates a new empty database.
    pub fn with_config(config: DbConfig) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            codec: Codec::with_empty_collapse(config.empty_collapse),
            config,
        }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Creates a table for a record type.
    ///
    /// # Arguments
    /// * `primary_key` - Name of the field whose value identifies a record
    ///
    /// # Returns
    /// `Result<(), DbError>`; `TableExists` if the type already has a table,
    /// `InvalidPrimaryKey` if `T` declares no such field.
    pub fn create_table<T: Record>(&self, primary_key: &str) -> Result<()> {
        self.create_table_from(T::descriptor(), primary_key)
    }

    /// Creates a table from a runtime descriptor.
    pub fn create_table_from(&self, descriptor: TypeDescriptor, primary_key: &str) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.contains_key(&descriptor.name) {
            return Err(DbError::TableExists(descriptor.name));
        }
        let name = descriptor.name.clone();
        let table = Table::create(
            descriptor,
            primary_key,
            self.config.initial_table_capacity,
            self.codec,
        )?;
        tables.insert(name.clone(), Arc::new(table));
        tracing::debug!(table = %name, primary_key = %primary_key, "Created table");
        Ok(())
    }

    /// Inserts a record into its type's table.
    pub fn insert<T: Record>(&self, record: &T) -> Result<()> {
        self.insert_value(record.to_value())
    }

    /// Inserts a dynamic record value.
    ///
    /// A present pointer is dereferenced first. The table is selected by the
    /// value's type name: the structure name, or the kind name otherwise.
    pub fn insert_value(&self, record: Value) -> Result<()> {
        let mut record = record;
        while let Value::Pointer(Some(inner)) = record {
            record = *inner;
        }

        let table = self.table(record.type_name())?;
        let key = table.insert(&record)?;
        tracing::debug!(table = %table.name(), key = %key, "Inserted record");
        Ok(())
    }

    /// Gets a record by primary key.
    pub fn get<T: Record>(&self, key: &str) -> Result<T> {
        let desc = T::descriptor();
        let value = self.get_value(&desc.name, key)?;
        T::from_value(value).map_err(|source| DbError::RecordMismatch {
            table: desc.name,
            source,
        })
    }

    /// Gets a record by table name and primary key as a dynamic value.
    pub fn get_value(&self, table: &str, key: &str) -> Result<Value> {
        self.table(table)?.get(key)
    }

    /// Returns a handle to a table.
    pub fn table(&self, name: &str) -> Result<Arc<Table>> {
        self.tables
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DbError::InvalidTableName(name.to_string()))
    }

    /// Returns all table names, sorted.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn table_count(&self) -> usize {
        self.tables.read().len()
    }

    /// Drops every table.
    pub fn reset(&self) {
        self.tables.write().clear();
        tracing::debug!("Reset database");
    }
}

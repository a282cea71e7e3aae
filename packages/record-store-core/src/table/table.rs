//! Table schema and record storage.
//!
//! Each table has:
//! - The record type's descriptor
//! - The name of its primary key field
//! - Encoded records in insertion order, behind a reader/writer lock
//!
//! Lookups scan the records linearly.

use parking_lot::RwLock;

use crate::codec::Codec;
use crate::error::DbError;
use crate::types::{StructValue, TypeDescriptor, Value, ValueError};

/// One stored record: its stringified primary key and encoded blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Primary key text
    pub key: String,
    /// Encoded record
    pub blob: String,
}

/// Table schema and records.
#[derive(Debug)]
pub struct Table {
    /// Record type descriptor; its name is the table name
    descriptor: TypeDescriptor,
    /// Primary key field name
    primary_key: String,
    /// Codec used for records and keys
    codec: Codec,
    /// Records in insertion order
    records: RwLock<Vec<StoredRecord>>,
}

impl Table {
    /// Creates an empty table.
    ///
    /// # Arguments
    /// * `descriptor` - Record type descriptor
    /// * `primary_key` - Name of a field declared by `descriptor`
    /// * `initial_capacity` - Initial record capacity
    /// * `codec` - Codec for records and keys
    ///
    /// # Returns
    /// `Result<Table, DbError>`; `InvalidPrimaryKey` if the field is missing,
    /// `Config` if the initial capacity cannot be reserved.
    pub fn create(
        descriptor: TypeDescriptor,
        primary_key: &str,
        initial_capacity: usize,
        codec: Codec,
    ) -> Result<Self, DbError> {
        if !descriptor.has_field(primary_key) {
            return Err(DbError::InvalidPrimaryKey {
                table: descriptor.name.clone(),
                field: primary_key.to_string(),
            });
        }
        let mut records = Vec::new();
        records.try_reserve(initial_capacity).map_err(|e| {
            DbError::Config(format!(
                "Invalid initial_table_capacity {}: {}",
                initial_capacity, e
            ))
        })?;
        Ok(Self {
            descriptor,
            primary_key: primary_key.to_string(),
            codec,
            records: RwLock::new(records),
        })
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Number of stored records.
    pub fn record_count(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if a record with this key is stored.
    pub fn contains_key(&self, key: &str) -> bool {
        self.records.read().iter().any(|r| r.key == key)
    }

    /// Stringifies the primary key of a record value.
    ///
    /// The key text is the field's codec slot text: strings as-is, other
    /// scalars in canonical form, composites as their blob, an absent pointer
    /// as the empty string.
    pub fn key_of(&self, record: &Value) -> Result<String, DbError> {
        let fields = self.conforming(record)?;
        let key_value = fields.get(&self.primary_key).ok_or_else(|| {
            self.mismatch(ValueError::MissingField(self.primary_key.clone()))
        })?;
        self.codec
            .encode_slot(key_value)
            .map_err(|source| DbError::InvalidEncoding {
                table: self.name().to_string(),
                source,
            })
    }

    /// Inserts a record and returns its key.
    ///
    /// The duplicate check, encoding and append happen under one write lock;
    /// on failure the table is unchanged.
    pub fn insert(&self, record: &Value) -> Result<String, DbError> {
        let key = self.key_of(record)?;

        let mut records = self.records.write();
        if records.iter().any(|r| r.key == key) {
            tracing::warn!(table = %self.name(), key = %key, "Rejected duplicate record");
            return Err(DbError::DuplicateRecord {
                table: self.name().to_string(),
                key,
            });
        }
        let blob = self.codec.encode(record).map_err(|source| {
            tracing::warn!(
                table = %self.name(),
                key = %key,
                error = %source,
                "Rejected unencodable record"
            );
            DbError::InvalidEncoding {
                table: self.name().to_string(),
                source,
            }
        })?;
        records.push(StoredRecord {
            key: key.clone(),
            blob,
        });
        Ok(key)
    }

    /// Finds a record by key and decodes it against the table's descriptor.
    pub fn get(&self, key: &str) -> Result<Value, DbError> {
        let records = self.records.read();
        let stored = records
            .iter()
            .find(|r| r.key == key)
            .ok_or_else(|| DbError::RecordNotFound {
                table: self.name().to_string(),
                key: key.to_string(),
            })?;
        self.codec
            .decode(&stored.blob, &self.descriptor)
            .map_err(|source| DbError::InvalidEncoding {
                table: self.name().to_string(),
                source,
            })
    }

    /// Checks that a record is a structure carrying exactly the descriptor's
    /// fields, in order, each of the declared kind.
    fn conforming<'v>(&self, record: &'v Value) -> Result<&'v StructValue, DbError> {
        let fields = match record {
            Value::Struct(s) => s,
            other => {
                return Err(self.mismatch(ValueError::Mismatch {
                    expected: "struct",
                    found: other.kind_name(),
                }))
            }
        };
        fields
            .conforms_to(&self.descriptor)
            .map_err(|source| self.mismatch(source))?;
        Ok(fields)
    }

    fn mismatch(&self, source: ValueError) -> DbError {
        DbError::RecordMismatch {
            table: self.name().to_string(),
            source,
        }
    }
}

//! Database error types.

use thiserror::Error;

use crate::codec::{CodecError, CodecErrorKind};
use crate::types::ValueError;

/// Table store, engine and key-value store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    /// Primary key names a field the record type does not declare
    #[error("Invalid primary key '{field}' for table '{table}'")]
    InvalidPrimaryKey { table: String, field: String },

    /// Table already exists
    #[error("Table '{0}' already exists")]
    TableExists(String),

    /// No table registered for the identifier
    #[error("Invalid table name '{0}'")]
    InvalidTableName(String),

    /// A record with the same primary key is already stored
    #[error("Duplicate record with key '{key}' in table '{table}'")]
    DuplicateRecord { table: String, key: String },

    /// No record with the key
    #[error("Record with key '{key}' not found in table '{table}'")]
    RecordNotFound { table: String, key: String },

    /// Record could not be encoded, or a stored blob could not be decoded
    #[error("Invalid encoding in table '{table}': {source}")]
    InvalidEncoding {
        table: String,
        #[source]
        source: CodecError,
    },

    /// Decoded value does not convert to the requested record type
    #[error("Record in table '{table}' does not match the requested type: {source}")]
    RecordMismatch {
        table: String,
        #[source]
        source: ValueError,
    },

    /// No engine registered under the name
    #[error("Unknown storage engine '{0}'")]
    UnknownEngine(String),

    /// Key already present in the key-value store
    #[error("Key '{0}' already exists")]
    KeyExists(String),

    /// Key absent from the key-value store
    #[error("Key '{0}' not found")]
    KeyNotFound(String),

    /// JSON document does not fit the record schema
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Outermost codec error kind, for encoding failures.
    pub fn codec_kind(&self) -> Option<CodecErrorKind> {
        match self {
            DbError::InvalidEncoding { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Result alias for database operations.
pub type Result<T> = std::result::Result<T, DbError>;

//! Embedded record store with a type-directed text codec.
//!
//! Records are encoded into self-delimiting base64 blobs by [`codec`] and
//! stored per type in [`Database`] tables keyed by a primary key field.
//! Types describe themselves with a [`TypeDescriptor`]; Rust structures get
//! one through the [`record!`] macro.

pub mod codec;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod json;
pub mod kv;
pub mod record;
pub mod table;
pub mod types;

pub use codec::{Codec, CodecError, CodecErrorKind, EmptyCollapse};
pub use config::DbConfig;
pub use database::Database;
pub use engine::{EngineRegistry, StorageEngine};
pub use error::DbError;
pub use kv::KvStore;
pub use record::{FieldValue, Record};
pub use table::Table;
pub use types::{
    FieldDescriptor, FieldKind, OpaqueKind, StructValue, TypeDescriptor, Value, ValueError,
};

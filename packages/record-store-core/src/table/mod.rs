//! Record tables: schema, primary key, and encoded records.

#[allow(clippy::module_inception)]
mod table;

pub use table::{StoredRecord, Table};

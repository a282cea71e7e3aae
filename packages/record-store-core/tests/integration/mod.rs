//! Integration test suite.
//!
//! 1. Table store operations through typed records
//! 2. Codec properties
//! 3. Concurrent inserts and reads
//! 4. Engine selection from configuration and JSON import

pub mod codec_tests;
pub mod concurrency_tests;
pub mod engine_tests;
pub mod helpers;
pub mod table_store_tests;

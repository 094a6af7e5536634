//! Persistence layer
//!
//! Samples are stored through the [`StorageBackend`] trait; the shipped
//! implementation is SQLite via sqlx. The connection pool is the only
//! resource shared between the collector task and the API server.

pub mod backend;
pub mod error;
pub mod schema;
pub mod sqlite;

pub use backend::{QueryRange, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use schema::SampleRow;
pub use sqlite::SqliteBackend;

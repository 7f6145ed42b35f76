//! # storage-adapters
//!
//! Concrete implementations of the `domains` repo ports. The SQLite
//! adapter is the only backend today; the feature gate keeps the door open
//! for a server-grade engine without touching the service layer.

#[cfg(feature = "db-sqlite")]
pub mod sqlite;

#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteStore;

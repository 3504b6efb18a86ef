//! Database layer for the climate dataset.
//!
//! This module provides the SQLite-backed implementation of the `ClimateStore`
//! trait. The database is opened read-only and is never created or migrated.

pub mod models;
pub mod sqlite;

pub use models::*;
pub use sqlite::SqliteClimateStore;

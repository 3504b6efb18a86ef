//! # Climate Crate
//!
//! Read-only access to the historical weather dataset and the HTTP API that
//! serves canned summaries of it.
//!
//! ## Key Components
//!
//! - **Domain Types**: `Measurement`, `Station`, `PrecipitationReading`,
//!   `TemperatureReading`, `TemperatureSummary`
//! - **Traits**: `ClimateStore` for data-source abstraction
//! - **In-Memory Store**: Default implementation for testing and development
//! - **SQLite Store**: Production implementation over the Hawaii dataset
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Climate API                         │
//! │   GET /api/v1.0/precipitation   GET /api/v1.0/stations   │
//! │   GET /api/v1.0/tobs            GET /api/v1.0/{start}..  │
//! └──────────────────────────────────────────────────────────┘
//!                              │  one query per request
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                 ClimateStore (trait)                     │
//! │   SqliteClimateStore        │   InMemoryClimateStore     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Dates are `yyyy-mm-dd` strings compared lexically on the query path.

pub mod error;
pub mod store;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod db;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for convenience
pub use error::{ClimateError, ClimateResult};
pub use store::{resolve_query_defaults, ClimateStore, InMemoryClimateStore};
pub use types::{
    Measurement, PrecipitationReading, QueryDefaults, Station, TemperatureReading,
    TemperatureSummary,
};

#[cfg(feature = "sqlite")]
pub use db::SqliteClimateStore;

#[cfg(feature = "api")]
pub use api::{climate_routes, ClimateApiState};

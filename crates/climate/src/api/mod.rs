//! HTTP API for the climate dataset.
//!
//! ## Modules
//!
//! - `handlers` - One handler per route, each issuing a single store query
//! - `routes` - Axum router
//! - `models` - JSON response shapes and the reshaping helpers

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::ClimateApiState;
pub use routes::climate_routes;

//! Axum route definitions for the climate API.

use crate::api::handlers::{self, ClimateApiState};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Create all climate routes.
///
/// # Routes
///
/// - `GET /` - Route listing (plain text)
/// - `GET /api/v1.0/precipitation` - Precipitation since the cutoff date
/// - `GET /api/v1.0/stations` - Station ids with measurements
/// - `GET /api/v1.0/tobs` - Temperatures of one station since the cutoff date
/// - `GET /api/v1.0/:start` - Min/avg/max temperature from `start`
/// - `GET /api/v1.0/:start/:end` - Min/avg/max temperature between `start` and `end`
///
/// The fixed routes take priority over the `:start` capture.
pub fn climate_routes(state: Arc<ClimateApiState>) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/api/v1.0/precipitation", get(handlers::precipitation))
        .route("/api/v1.0/stations", get(handlers::stations))
        .route("/api/v1.0/tobs", get(handlers::tobs))
        .route("/api/v1.0/:start", get(handlers::temperature_from_start))
        .route("/api/v1.0/:start/:end", get(handlers::temperature_for_range))
        .with_state(state)
}

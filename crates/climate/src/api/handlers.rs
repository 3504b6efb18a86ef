//! HTTP request handlers for the climate API.

use crate::api::models::*;
use crate::error::ClimateError;
use crate::store::ClimateStore;
use crate::types::QueryDefaults;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tracing::{error, info};

/// Plain-text route listing served at `/`.
pub const WELCOME_TEXT: &str = "Welcome to Hawaii Weather Data API!
All available Routes:
Daily Precipitation Totals for the Last 12 Months: /api/v1.0/precipitation
List of Weather Stations: /api/v1.0/stations
Temperature Observations for Most Active Station over Last 12 Months: /api/v1.0/tobs
Min, Average & Max Temperatures from Start Date: /api/v1.0/start
Min, Average & Max Temperatures for Date Range: /api/v1.0/start/end
NOTE: Please enter all 'start' and 'end' dates in yyyy-mm-dd format. For example: /api/v1.0/2012-07-01/2012-07-03.
";

/// Shared state for climate API handlers.
pub struct ClimateApiState {
    /// Process-wide read-only data source
    pub store: Arc<dyn ClimateStore>,
    /// Cutoff date and station for the fixed routes
    pub defaults: QueryDefaults,
}

impl ClimateApiState {
    pub fn new(store: Arc<dyn ClimateStore>, defaults: QueryDefaults) -> Self {
        Self { store, defaults }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn store_error(context: &str, err: ClimateError) -> ApiError {
    error!(%err, "{}", context);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::from(&err)))
}

/// GET /
pub async fn welcome() -> &'static str {
    info!("Server received request for 'Welcome' page...");
    WELCOME_TEXT
}

/// GET /api/v1.0/precipitation
pub async fn precipitation(
    State(state): State<Arc<ClimateApiState>>,
) -> Result<Json<Vec<PrecipitationRecord>>, ApiError> {
    let readings = state
        .store
        .precipitation_since(&state.defaults.cutoff_date)
        .await
        .map_err(|e| store_error("Failed to query precipitation", e))?;

    info!("Server received request for Daily Precipitation Totals for the Last 12 Months...");
    Ok(Json(precipitation_records(readings)))
}

/// GET /api/v1.0/stations
pub async fn stations(
    State(state): State<Arc<ClimateApiState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let ids = state
        .store
        .list_station_ids()
        .await
        .map_err(|e| store_error("Failed to list stations", e))?;

    info!("Server received request for List of Weather Stations...");
    Ok(Json(ids))
}

/// GET /api/v1.0/tobs
pub async fn tobs(
    State(state): State<Arc<ClimateApiState>>,
) -> Result<Json<TemperatureObservations>, ApiError> {
    let readings = state
        .store
        .temperature_observations(&state.defaults.tobs_station, &state.defaults.cutoff_date)
        .await
        .map_err(|e| store_error("Failed to query temperature observations", e))?;

    info!(
        station = %state.defaults.tobs_station,
        "Server received request for Temperature Observations for Most Active Station over Last 12 Months..."
    );
    Ok(Json(observations_by_date(readings)))
}

/// GET /api/v1.0/{start}
///
/// `start` is not validated; it is compared lexically against stored dates.
pub async fn temperature_from_start(
    State(state): State<Arc<ClimateApiState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummaryRecord>>, ApiError> {
    let summary = state
        .store
        .temperature_summary(&start, None)
        .await
        .map_err(|e| store_error("Failed to summarize temperatures", e))?;

    info!(%start, "Server received request for Min, Average & Max Temperatures from Start Date...");
    Ok(Json(summary_records(summary)))
}

/// GET /api/v1.0/{start}/{end}
pub async fn temperature_for_range(
    State(state): State<Arc<ClimateApiState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummaryRecord>>, ApiError> {
    let summary = state
        .store
        .temperature_summary(&start, Some(end.as_str()))
        .await
        .map_err(|e| store_error("Failed to summarize temperatures", e))?;

    info!(
        %start,
        %end,
        "Server received request for Min, Average & Max Temperatures from Date Range..."
    );
    Ok(Json(summary_records(summary)))
}

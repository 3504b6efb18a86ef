//! API response models.

use crate::error::ClimateError;
use crate::types::{PrecipitationReading, TemperatureReading, TemperatureSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of `/api/v1.0/precipitation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Precipitation")]
    pub precipitation: Option<f64>,
}

impl From<PrecipitationReading> for PrecipitationRecord {
    fn from(reading: PrecipitationReading) -> Self {
        Self {
            date: reading.date,
            precipitation: reading.precipitation,
        }
    }
}

/// Body of `/api/v1.0/tobs`: date → temperature.
pub type TemperatureObservations = BTreeMap<String, Option<f64>>;

/// Aggregate entry of `/api/v1.0/{start}` and `/api/v1.0/{start}/{end}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummaryRecord {
    #[serde(rename = "Min")]
    pub min: Option<f64>,
    #[serde(rename = "Average")]
    pub average: Option<f64>,
    #[serde(rename = "Max")]
    pub max: Option<f64>,
}

impl From<TemperatureSummary> for TemperatureSummaryRecord {
    fn from(summary: TemperatureSummary) -> Self {
        Self {
            min: summary.min,
            average: summary.avg,
            max: summary.max,
        }
    }
}

/// Error body returned when the data source fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub category: String,
}

impl From<&ClimateError> for ErrorResponse {
    fn from(err: &ClimateError) -> Self {
        Self {
            error: err.to_string(),
            category: err.category().to_string(),
        }
    }
}

/// Reshape precipitation rows into `{"Date", "Precipitation"}` records.
pub fn precipitation_records(readings: Vec<PrecipitationReading>) -> Vec<PrecipitationRecord> {
    readings.into_iter().map(Into::into).collect()
}

/// Reshape temperature rows into a date-keyed object.
///
/// A date seen twice keeps the later value.
pub fn observations_by_date(readings: Vec<TemperatureReading>) -> TemperatureObservations {
    let mut observations = TemperatureObservations::new();
    for reading in readings {
        observations.insert(reading.date, reading.temperature);
    }
    observations
}

/// Reshape an aggregate into a zero- or one-element array.
pub fn summary_records(summary: TemperatureSummary) -> Vec<TemperatureSummaryRecord> {
    if summary.is_empty() {
        Vec::new()
    } else {
        vec![summary.into()]
    }
}

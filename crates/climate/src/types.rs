//! Core domain types for the climate dataset.

use crate::error::{ClimateError, ClimateResult};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date format used throughout the dataset.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Cutoff used by the "last 12 months" routes when none is configured.
pub const DEFAULT_CUTOFF_DATE: &str = "2016-08-23";

/// Station reported by `/api/v1.0/tobs` when none is configured.
pub const DEFAULT_TOBS_STATION: &str = "USC00519281";

/// A single weather observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Reporting station identifier (e.g., `USC00519281`).
    pub station_id: String,
    /// Observation date, `yyyy-mm-dd`.
    pub date: String,
    /// Precipitation in inches.
    pub precipitation: Option<f64>,
    /// Observed temperature in degrees Fahrenheit.
    pub temperature_observation: Option<f64>,
}

impl Measurement {
    pub fn new(
        station_id: impl Into<String>,
        date: impl Into<String>,
        precipitation: Option<f64>,
        temperature_observation: Option<f64>,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            date: date.into(),
            precipitation,
            temperature_observation,
        }
    }
}

/// A weather reporting location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_id: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

impl Station {
    /// Create a station with no metadata.
    pub fn new(station_id: impl Into<String>) -> Self {
        Self {
            station_id: station_id.into(),
            name: None,
            latitude: None,
            longitude: None,
            elevation: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// One row of the precipitation query.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationReading {
    pub date: String,
    pub precipitation: Option<f64>,
}

/// One row of the temperature observation query.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReading {
    pub date: String,
    pub temperature: Option<f64>,
}

/// Min/avg/max over a filtered set of temperature observations.
///
/// `rows` counts matched measurements, including those without a
/// temperature, so an all-`None` aggregate over matched rows is not empty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TemperatureSummary {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
    pub rows: u64,
}

impl TemperatureSummary {
    /// Summary of an empty observation set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Aggregate one entry per matched row; `None` temperatures are counted
    /// as rows but left out of min/avg/max.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut rows = 0u64;
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in observations {
            rows += 1;
            let Some(value) = value else { continue };
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return Self {
                rows,
                ..Self::empty()
            };
        }

        Self {
            min: Some(min),
            avg: Some(sum / count as f64),
            max: Some(max),
            rows,
        }
    }

    /// True when no measurement matched.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Fixed parameters of the "last 12 months" routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDefaults {
    /// Lower date bound for `/precipitation` and `/tobs`.
    pub cutoff_date: String,
    /// Station reported by `/tobs`.
    pub tobs_station: String,
}

impl QueryDefaults {
    pub fn new(cutoff_date: impl Into<String>, tobs_station: impl Into<String>) -> Self {
        Self {
            cutoff_date: cutoff_date.into(),
            tobs_station: tobs_station.into(),
        }
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF_DATE, DEFAULT_TOBS_STATION)
    }
}

/// Date twelve months before `date`, clamped to the end of the month.
///
/// Only used to derive a cutoff at startup; queries never parse dates.
pub fn one_year_before(date: &str) -> ClimateResult<String> {
    let parsed = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e| {
        ClimateError::InvalidDate {
            date: date.to_string(),
            message: e.to_string(),
        }
    })?;

    parsed
        .checked_sub_months(Months::new(12))
        .map(|d| d.format(DATE_FORMAT).to_string())
        .ok_or_else(|| ClimateError::InvalidDate {
            date: date.to_string(),
            message: "date out of range".to_string(),
        })
}

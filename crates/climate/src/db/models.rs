//! Database row models for measurement queries.
//!
//! These structs map directly to SQLite result rows and handle conversion to
//! the domain types in `crate::types`.

use crate::types::{PrecipitationReading, TemperatureReading, TemperatureSummary};
use sqlx::FromRow;

/// Table holding one row per observation.
pub const MEASUREMENT_TABLE: &str = "measurement";

/// Table holding station metadata.
pub const STATION_TABLE: &str = "station";

/// Row of the per-date precipitation query.
#[derive(Debug, Clone, FromRow)]
pub struct PrecipitationRow {
    pub date: String,
    pub prcp: Option<f64>,
}

impl From<PrecipitationRow> for PrecipitationReading {
    fn from(row: PrecipitationRow) -> Self {
        Self {
            date: row.date,
            precipitation: row.prcp,
        }
    }
}

/// Row of the per-date temperature query.
#[derive(Debug, Clone, FromRow)]
pub struct TemperatureRow {
    pub date: String,
    pub tobs: Option<f64>,
}

impl From<TemperatureRow> for TemperatureReading {
    fn from(row: TemperatureRow) -> Self {
        Self {
            date: row.date,
            temperature: row.tobs,
        }
    }
}

/// Single row produced by the min/avg/max aggregate.
#[derive(Debug, Clone, Default, FromRow)]
pub struct SummaryRow {
    pub min_tobs: Option<f64>,
    pub avg_tobs: Option<f64>,
    pub max_tobs: Option<f64>,
    pub matched_rows: i64,
}

impl From<SummaryRow> for TemperatureSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            min: row.min_tobs,
            avg: row.avg_tobs,
            max: row.max_tobs,
            rows: u64::try_from(row.matched_rows).unwrap_or(0),
        }
    }
}

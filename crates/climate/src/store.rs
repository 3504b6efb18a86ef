//! Climate data-source traits and implementations.
//!
//! This module defines the `ClimateStore` trait that abstracts away the
//! tabular data source. The SQLite adapter lives in `crate::db`.

use crate::error::{ClimateError, ClimateResult};
use crate::types::{
    one_year_before, Measurement, PrecipitationReading, QueryDefaults, Station,
    TemperatureReading, TemperatureSummary,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::info;

/// Read-only access to measurements and stations.
///
/// Dates are compared as plain strings. "One row per date" queries keep the
/// first stored row for each date. Queries that match nothing return empty
/// results rather than errors.
///
/// # Example
///
/// ```ignore
/// let readings = store.precipitation_since("2016-08-23").await?;
/// for reading in readings {
///     println!("{}: {:?}", reading.date, reading.precipitation);
/// }
/// ```
#[async_trait]
pub trait ClimateStore: Send + Sync {
    /// Precipitation for every date `>= date`, one row per date, ascending.
    async fn precipitation_since(&self, date: &str) -> ClimateResult<Vec<PrecipitationReading>>;

    /// Distinct ids of stations with at least one measurement, ascending.
    async fn list_station_ids(&self) -> ClimateResult<Vec<String>>;

    /// Temperatures for one station on every date `>= date`, one row per date, ascending.
    async fn temperature_observations(
        &self,
        station_id: &str,
        date: &str,
    ) -> ClimateResult<Vec<TemperatureReading>>;

    /// Min/avg/max temperature over `start <= date` (and `date <= end` when given).
    async fn temperature_summary(
        &self,
        start_date: &str,
        end_date: Option<&str>,
    ) -> ClimateResult<TemperatureSummary>;

    /// Greatest measurement date, if any measurements exist.
    async fn latest_measurement_date(&self) -> ClimateResult<Option<String>>;

    /// Station with the most measurements; ties resolve to the smallest id.
    async fn most_active_station(&self) -> ClimateResult<Option<String>>;

    /// Check that the data source is reachable.
    async fn ping(&self) -> ClimateResult<()>;
}

/// Fill in unset route parameters from the dataset.
///
/// A missing cutoff becomes one year before the latest measurement; a missing
/// station becomes the most active one.
pub async fn resolve_query_defaults(
    store: &dyn ClimateStore,
    cutoff_date: Option<String>,
    tobs_station: Option<String>,
) -> ClimateResult<QueryDefaults> {
    let cutoff_date = match cutoff_date {
        Some(date) => date,
        None => {
            let latest = store.latest_measurement_date().await?.ok_or_else(|| {
                ClimateError::EmptyDataset("no measurements to derive a cutoff date".into())
            })?;
            let derived = one_year_before(&latest)?;
            info!(latest = %latest, cutoff = %derived, "Derived cutoff date from dataset");
            derived
        }
    };

    let tobs_station = match tobs_station {
        Some(station) => station,
        None => {
            let station = store.most_active_station().await?.ok_or_else(|| {
                ClimateError::EmptyDataset("no measurements to pick a station".into())
            })?;
            info!(station = %station, "Using most active station for temperature observations");
            station
        }
    };

    Ok(QueryDefaults::new(cutoff_date, tobs_station))
}

/// In-memory climate store.
///
/// Holds the dataset in insertion order, which stands in for row order in the
/// SQL implementation. Useful for testing and development.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClimateStore {
    measurements: Vec<Measurement>,
    stations: Vec<Station>,
}

impl InMemoryClimateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing dataset.
    pub fn from_records(measurements: Vec<Measurement>, stations: Vec<Station>) -> Self {
        Self {
            measurements,
            stations,
        }
    }

    /// Append a measurement.
    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.measurements.push(measurement);
        self
    }

    /// Append a station.
    pub fn with_station(mut self, station: Station) -> Self {
        self.stations.push(station);
        self
    }

    /// Number of measurements held.
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Check if the store holds no measurements.
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Stations held by the store.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }
}

#[async_trait]
impl ClimateStore for InMemoryClimateStore {
    async fn precipitation_since(&self, date: &str) -> ClimateResult<Vec<PrecipitationReading>> {
        let mut by_date: BTreeMap<&str, Option<f64>> = BTreeMap::new();
        for m in self.measurements.iter().filter(|m| m.date.as_str() >= date) {
            by_date.entry(m.date.as_str()).or_insert(m.precipitation);
        }

        Ok(by_date
            .into_iter()
            .map(|(date, precipitation)| PrecipitationReading {
                date: date.to_string(),
                precipitation,
            })
            .collect())
    }

    async fn list_station_ids(&self) -> ClimateResult<Vec<String>> {
        let ids: BTreeSet<&str> = self
            .measurements
            .iter()
            .map(|m| m.station_id.as_str())
            .collect();

        Ok(ids.into_iter().map(String::from).collect())
    }

    async fn temperature_observations(
        &self,
        station_id: &str,
        date: &str,
    ) -> ClimateResult<Vec<TemperatureReading>> {
        let mut by_date: BTreeMap<&str, Option<f64>> = BTreeMap::new();
        for m in self
            .measurements
            .iter()
            .filter(|m| m.station_id == station_id && m.date.as_str() >= date)
        {
            by_date
                .entry(m.date.as_str())
                .or_insert(m.temperature_observation);
        }

        Ok(by_date
            .into_iter()
            .map(|(date, temperature)| TemperatureReading {
                date: date.to_string(),
                temperature,
            })
            .collect())
    }

    async fn temperature_summary(
        &self,
        start_date: &str,
        end_date: Option<&str>,
    ) -> ClimateResult<TemperatureSummary> {
        let observations = self
            .measurements
            .iter()
            .filter(|m| m.date.as_str() >= start_date)
            .filter(|m| end_date.map_or(true, |end| m.date.as_str() <= end))
            .map(|m| m.temperature_observation);

        Ok(TemperatureSummary::from_observations(observations))
    }

    async fn latest_measurement_date(&self) -> ClimateResult<Option<String>> {
        Ok(self.measurements.iter().map(|m| m.date.clone()).max())
    }

    async fn most_active_station(&self) -> ClimateResult<Option<String>> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for m in &self.measurements {
            *counts.entry(m.station_id.as_str()).or_default() += 1;
        }

        // Highest count first, then smallest id
        Ok(counts
            .into_iter()
            .min_by(|(a_id, a_count), (b_id, b_count)| {
                b_count.cmp(a_count).then_with(|| a_id.cmp(b_id))
            })
            .map(|(id, _)| id.to_string()))
    }

    async fn ping(&self) -> ClimateResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> InMemoryClimateStore {
        InMemoryClimateStore::new()
            .with_station(Station::new("USC00519281").with_name("WAIHEE 837.5, HI US"))
            .with_station(Station::new("USC00519397").with_name("WAIKIKI 717.2, HI US"))
            .with_measurement(Measurement::new("USC00519397", "2016-08-22", Some(0.4), Some(80.0)))
            .with_measurement(Measurement::new("USC00519397", "2016-08-23", Some(0.0), Some(81.0)))
            .with_measurement(Measurement::new("USC00519281", "2016-08-23", Some(1.79), Some(77.0)))
            .with_measurement(Measurement::new("USC00519281", "2016-08-24", Some(2.15), Some(77.0)))
            .with_measurement(Measurement::new("USC00519281", "2016-08-25", None, Some(80.0)))
            .with_measurement(Measurement::new("USC00519397", "2016-08-25", Some(0.08), None))
    }

    #[tokio::test]
    async fn test_precipitation_since_filters_lexically() {
        let store = sample_store();
        let readings = store.precipitation_since("2016-08-23").await.unwrap();

        assert!(readings.iter().all(|r| r.date.as_str() >= "2016-08-23"));
        let dates: Vec<_> = readings.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2016-08-23", "2016-08-24", "2016-08-25"]);
    }

    #[tokio::test]
    async fn test_precipitation_keeps_first_row_per_date() {
        let store = sample_store();
        let readings = store.precipitation_since("2016-08-23").await.unwrap();

        // USC00519397 was stored first for 2016-08-23
        assert_eq!(readings[0].precipitation, Some(0.0));
        // Missing precipitation is kept as a null row
        assert_eq!(readings[2].precipitation, None);
    }

    #[tokio::test]
    async fn test_list_station_ids_distinct() {
        let store = sample_store();
        let ids = store.list_station_ids().await.unwrap();
        assert_eq!(ids, vec!["USC00519281", "USC00519397"]);
    }

    #[tokio::test]
    async fn test_temperature_observations_single_station() {
        let store = sample_store();
        let readings = store
            .temperature_observations("USC00519281", "2016-08-23")
            .await
            .unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].temperature, Some(77.0));
        assert_eq!(readings[2].temperature, Some(80.0));

        let other = store
            .temperature_observations("USC00519397", "2016-08-23")
            .await
            .unwrap();
        assert_ne!(readings, other);
        assert_eq!(other[0].temperature, Some(81.0));
    }

    #[tokio::test]
    async fn test_temperature_summary_range() {
        let store = sample_store();
        let summary = store
            .temperature_summary("2016-08-23", Some("2016-08-23"))
            .await
            .unwrap();
        assert_eq!(summary.min, Some(77.0));
        assert_eq!(summary.max, Some(81.0));
        assert_eq!(summary.avg, Some(79.0));

        let open_ended = store.temperature_summary("2016-08-24", None).await.unwrap();
        assert_eq!(open_ended.min, Some(77.0));
        assert_eq!(open_ended.max, Some(80.0));
    }

    #[tokio::test]
    async fn test_temperature_summary_inverted_range_is_empty() {
        let store = sample_store();
        let summary = store
            .temperature_summary("2016-08-25", Some("2016-08-22"))
            .await
            .unwrap();
        assert!(summary.is_empty());
    }

    #[tokio::test]
    async fn test_temperature_summary_counts_rows_without_temperature() {
        let store = InMemoryClimateStore::new().with_measurement(Measurement::new(
            "USC00519281",
            "2016-08-23",
            Some(0.5),
            None,
        ));

        let summary = store.temperature_summary("2016-08-23", None).await.unwrap();
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.min, None);
        assert!(!summary.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_date_compares_lexically() {
        let store = sample_store();
        // "2016-8-23" sorts after every "2016-08-.." date
        let readings = store.precipitation_since("2016-8-23").await.unwrap();
        assert!(readings.is_empty());
    }

    #[tokio::test]
    async fn test_latest_date_and_most_active_station() {
        let store = sample_store();
        assert_eq!(
            store.latest_measurement_date().await.unwrap().as_deref(),
            Some("2016-08-25")
        );
        // Both stations have three rows; the smaller id wins
        assert_eq!(
            store.most_active_station().await.unwrap().as_deref(),
            Some("USC00519281")
        );
    }

    #[tokio::test]
    async fn test_resolve_query_defaults() {
        let store = sample_store();

        let explicit = resolve_query_defaults(
            &store,
            Some("2016-01-01".to_string()),
            Some("USC00519397".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(explicit, QueryDefaults::new("2016-01-01", "USC00519397"));

        let derived = resolve_query_defaults(&store, None, None).await.unwrap();
        assert_eq!(derived, QueryDefaults::new("2015-08-25", "USC00519281"));
    }

    #[tokio::test]
    async fn test_resolve_query_defaults_empty_store() {
        let store = InMemoryClimateStore::new();
        let result = resolve_query_defaults(&store, None, Some("X".to_string())).await;
        assert!(matches!(result, Err(ClimateError::EmptyDataset(_))));
    }

    #[test]
    fn test_in_memory_store_is_always_reachable() {
        let store = sample_store();
        assert!(tokio_test::block_on(store.ping()).is_ok());
        assert!(!store.is_empty());
    }
}

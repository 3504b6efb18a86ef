//! SQLite implementation of the `ClimateStore` trait.
//!
//! Every query checks out its own pooled connection and returns it when the
//! connection guard drops, on success and on error alike.

use crate::db::models::{
    PrecipitationRow, SummaryRow, TemperatureRow, MEASUREMENT_TABLE, STATION_TABLE,
};
use crate::error::{ClimateError, ClimateResult};
use crate::store::ClimateStore;
use crate::types::{PrecipitationReading, TemperatureReading, TemperatureSummary};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// SQLite-backed climate store.
///
/// Expects the Hawaii dataset layout:
/// - `measurement(id, station, date, prcp, tobs)`
/// - `station(id, station, name, latitude, longitude, elevation)`
#[derive(Debug, Clone)]
pub struct SqliteClimateStore {
    pool: SqlitePool,
}

impl SqliteClimateStore {
    /// Open the dataset read-only and verify its schema.
    ///
    /// Fails with `DataSourceUnavailable` when the file is missing, cannot be
    /// opened, or lacks the measurement and station tables.
    pub async fn connect(database_url: &str, max_connections: u32) -> ClimateResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                ClimateError::DataSourceUnavailable(format!(
                    "Invalid database URL '{}': {}",
                    database_url, e
                ))
            })?
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                ClimateError::DataSourceUnavailable(format!(
                    "Failed to open database '{}': {}",
                    database_url, e
                ))
            })?;

        let store = Self::from_pool(pool);
        store.verify_schema().await?;

        info!(url = %database_url, max_connections, "Connected to climate database");

        Ok(store)
    }

    /// Create from an existing connection pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Climate database connections closed");
    }

    /// Check that both dataset tables exist.
    pub async fn verify_schema(&self) -> ClimateResult<()> {
        let mut conn = self.session().await?;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN (?1, ?2)",
        )
        .bind(MEASUREMENT_TABLE)
        .bind(STATION_TABLE)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            ClimateError::DataSourceUnavailable(format!("Failed to read schema: {}", e))
        })?;

        for required in [MEASUREMENT_TABLE, STATION_TABLE] {
            if !tables.iter().any(|t| t == required) {
                return Err(ClimateError::DataSourceUnavailable(format!(
                    "Missing table '{}'",
                    required
                )));
            }
        }

        debug!(?tables, "Climate schema verified");
        Ok(())
    }

    /// Check out a connection for a single query.
    async fn session(&self) -> ClimateResult<PoolConnection<Sqlite>> {
        self.pool.acquire().await.map_err(|e| {
            ClimateError::DataSourceUnavailable(format!("Failed to acquire connection: {}", e))
        })
    }
}

fn query_failed(context: &str, e: sqlx::Error) -> ClimateError {
    ClimateError::QueryFailed(format!("{}: {}", context, e))
}

#[async_trait]
impl ClimateStore for SqliteClimateStore {
    #[instrument(skip(self))]
    async fn precipitation_since(&self, date: &str) -> ClimateResult<Vec<PrecipitationReading>> {
        let mut conn = self.session().await?;

        // First stored row per date
        let rows = sqlx::query_as::<_, PrecipitationRow>(
            r#"
            SELECT date, CAST(prcp AS REAL) AS prcp
            FROM measurement
            WHERE rowid IN (
                SELECT MIN(rowid) FROM measurement WHERE date >= ?1 GROUP BY date
            )
            ORDER BY date ASC
            "#,
        )
        .bind(date)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to query precipitation", e))?;

        debug!(rows = rows.len(), "Fetched precipitation");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_station_ids(&self) -> ClimateResult<Vec<String>> {
        let mut conn = self.session().await?;

        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT station FROM measurement GROUP BY station ORDER BY station ASC",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to list stations", e))?;

        debug!(stations = ids.len(), "Fetched station ids");
        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn temperature_observations(
        &self,
        station_id: &str,
        date: &str,
    ) -> ClimateResult<Vec<TemperatureReading>> {
        let mut conn = self.session().await?;

        let rows = sqlx::query_as::<_, TemperatureRow>(
            r#"
            SELECT date, CAST(tobs AS REAL) AS tobs
            FROM measurement
            WHERE rowid IN (
                SELECT MIN(rowid) FROM measurement
                WHERE station = ?1 AND date >= ?2
                GROUP BY date
            )
            ORDER BY date ASC
            "#,
        )
        .bind(station_id)
        .bind(date)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to query temperature observations", e))?;

        debug!(rows = rows.len(), "Fetched temperature observations");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn temperature_summary(
        &self,
        start_date: &str,
        end_date: Option<&str>,
    ) -> ClimateResult<TemperatureSummary> {
        let mut conn = self.session().await?;

        // An aggregate without GROUP BY always yields one row; count 0 when nothing matched
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT
                CAST(MIN(tobs) AS REAL) AS min_tobs,
                CAST(AVG(tobs) AS REAL) AS avg_tobs,
                CAST(MAX(tobs) AS REAL) AS max_tobs,
                COUNT(*) AS matched_rows
            FROM measurement
            WHERE date >= ?1 AND (?2 IS NULL OR date <= ?2)
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to summarize temperatures", e))?;

        Ok(row.unwrap_or_default().into())
    }

    #[instrument(skip(self))]
    async fn latest_measurement_date(&self) -> ClimateResult<Option<String>> {
        let mut conn = self.session().await?;

        sqlx::query_scalar::<_, Option<String>>("SELECT MAX(date) FROM measurement")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| query_failed("Failed to read latest date", e))
    }

    #[instrument(skip(self))]
    async fn most_active_station(&self) -> ClimateResult<Option<String>> {
        let mut conn = self.session().await?;

        sqlx::query_scalar::<_, String>(
            r#"
            SELECT station FROM measurement
            GROUP BY station
            ORDER BY COUNT(*) DESC, station ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| query_failed("Failed to find most active station", e))
    }

    async fn ping(&self) -> ClimateResult<()> {
        let mut conn = self.session().await?;

        sqlx::query("SELECT 1")
            .execute(&mut *conn)
            .await
            .map_err(|e| ClimateError::DataSourceUnavailable(format!("Ping failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_store(rows: &[(&str, &str, Option<f64>, Option<f64>)]) -> SqliteClimateStore {
        // A single connection keeps the in-memory database alive for the test
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::raw_sql(
            r#"
            CREATE TABLE station (
                id INTEGER PRIMARY KEY, station TEXT, name TEXT,
                latitude FLOAT, longitude FLOAT, elevation FLOAT
            );
            CREATE TABLE measurement (
                id INTEGER PRIMARY KEY, station TEXT, date TEXT, prcp FLOAT, tobs FLOAT
            );
            INSERT INTO station (station, name) VALUES
                ('USC00519281', 'WAIHEE 837.5, HI US'),
                ('USC00519397', 'WAIKIKI 717.2, HI US');
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        for (station, date, prcp, tobs) in rows {
            sqlx::query(
                "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(*station)
            .bind(*date)
            .bind(*prcp)
            .bind(*tobs)
            .execute(&pool)
            .await
            .unwrap();
        }

        SqliteClimateStore::from_pool(pool)
    }

    fn sample_rows() -> Vec<(&'static str, &'static str, Option<f64>, Option<f64>)> {
        vec![
            ("USC00519397", "2016-08-22", Some(0.4), Some(80.0)),
            ("USC00519397", "2016-08-23", Some(0.0), Some(81.0)),
            ("USC00519281", "2016-08-23", Some(1.79), Some(77.0)),
            ("USC00519281", "2016-08-24", Some(2.15), Some(77.0)),
            ("USC00519281", "2016-08-25", None, Some(80.0)),
            ("USC00519397", "2016-08-25", Some(0.08), None),
        ]
    }

    #[tokio::test]
    async fn test_verify_schema() {
        let store = seeded_store(&[]).await;
        assert!(store.verify_schema().await.is_ok());
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_schema_missing_table() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::raw_sql(
            "CREATE TABLE measurement (
                id INTEGER PRIMARY KEY, station TEXT, date TEXT, prcp FLOAT, tobs FLOAT
            );",
        )
        .execute(&pool)
        .await
        .unwrap();

        let store = SqliteClimateStore::from_pool(pool);
        let result = store.verify_schema().await;
        assert!(matches!(result, Err(ClimateError::DataSourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_connect_missing_file_fails() {
        let result =
            SqliteClimateStore::connect("sqlite:///nonexistent/dir/hawaii.sqlite", 1).await;
        assert!(matches!(result, Err(ClimateError::DataSourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_precipitation_since() {
        let store = seeded_store(&sample_rows()).await;
        let readings = store.precipitation_since("2016-08-23").await.unwrap();

        let dates: Vec<_> = readings.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2016-08-23", "2016-08-24", "2016-08-25"]);
        // First stored row for the date wins
        assert_eq!(readings[0].precipitation, Some(0.0));
        assert_eq!(readings[2].precipitation, None);
    }

    #[tokio::test]
    async fn test_list_station_ids() {
        let store = seeded_store(&sample_rows()).await;
        let ids = store.list_station_ids().await.unwrap();
        assert_eq!(ids, vec!["USC00519281", "USC00519397"]);
    }

    #[tokio::test]
    async fn test_temperature_observations() {
        let store = seeded_store(&sample_rows()).await;
        let readings = store
            .temperature_observations("USC00519281", "2016-08-23")
            .await
            .unwrap();

        assert_eq!(
            readings,
            vec![
                TemperatureReading {
                    date: "2016-08-23".into(),
                    temperature: Some(77.0),
                },
                TemperatureReading {
                    date: "2016-08-24".into(),
                    temperature: Some(77.0),
                },
                TemperatureReading {
                    date: "2016-08-25".into(),
                    temperature: Some(80.0),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_temperature_summary() {
        let store = seeded_store(&sample_rows()).await;

        let summary = store
            .temperature_summary("2016-08-23", Some("2016-08-23"))
            .await
            .unwrap();
        assert_eq!(summary.min, Some(77.0));
        assert_eq!(summary.avg, Some(79.0));
        assert_eq!(summary.max, Some(81.0));

        let inverted = store
            .temperature_summary("2016-08-25", Some("2016-08-22"))
            .await
            .unwrap();
        assert!(inverted.is_empty());

        let none_matched = store.temperature_summary("2017-01-01", None).await.unwrap();
        assert_eq!(none_matched, TemperatureSummary::empty());
    }

    #[tokio::test]
    async fn test_temperature_summary_counts_rows_without_temperature() {
        let store = seeded_store(&[("USC00519397", "2016-08-25", Some(0.08), None)]).await;

        let summary = store.temperature_summary("2016-08-25", None).await.unwrap();
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.min, None);
        assert_eq!(summary.avg, None);
        assert_eq!(summary.max, None);
        assert!(!summary.is_empty());
    }

    #[tokio::test]
    async fn test_latest_date_and_most_active_station() {
        let store = seeded_store(&sample_rows()).await;
        assert_eq!(
            store.latest_measurement_date().await.unwrap().as_deref(),
            Some("2016-08-25")
        );
        assert_eq!(
            store.most_active_station().await.unwrap().as_deref(),
            Some("USC00519281")
        );

        let empty = seeded_store(&[]).await;
        assert_eq!(empty.latest_measurement_date().await.unwrap(), None);
        assert_eq!(empty.most_active_station().await.unwrap(), None);
    }
}

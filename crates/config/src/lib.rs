use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level SurfsUp configuration file.
///
/// Every section is optional; omitted sections take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SurfsUpConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub queries: QueriesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite URL of the dataset, e.g. `sqlite://Resources/hawaii.sqlite`
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Parameters of the fixed "last 12 months" routes.
///
/// An explicit `null` derives the value from the dataset at startup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QueriesConfig {
    /// Lower date bound (`yyyy-mm-dd`) for `/precipitation` and `/tobs`
    #[serde(default = "default_cutoff_date")]
    pub cutoff_date: Option<String>,
    /// Station reported by `/tobs`
    #[serde(default = "default_tobs_station")]
    pub tobs_station: Option<String>,
}

impl Default for QueriesConfig {
    fn default() -> Self {
        Self {
            cutoff_date: default_cutoff_date(),
            tobs_station: default_tobs_station(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// One of `pretty`, `json`, `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 8080
database:
  url: sqlite://data/hawaii.sqlite
  max_connections: 2
queries:
  cutoff_date: "2017-01-01"
  tobs_station: USC00513117
logging:
  level: debug
  format: json
"#;
        let config: SurfsUpConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite://data/hawaii.sqlite");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.queries.cutoff_date.as_deref(), Some("2017-01-01"));
        assert_eq!(config.queries.tobs_station.as_deref(), Some("USC00513117"));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: SurfsUpConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, SurfsUpConfig::default());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.queries.cutoff_date.as_deref(), Some("2016-08-23"));
        assert_eq!(config.queries.tobs_station.as_deref(), Some("USC00519281"));
    }

    #[test]
    fn test_null_queries_are_derived() {
        let yaml = "queries:\n  cutoff_date: null\n  tobs_station: ~\n";
        let config: SurfsUpConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.queries.cutoff_date, None);
        assert_eq!(config.queries.tobs_station, None);
    }
}

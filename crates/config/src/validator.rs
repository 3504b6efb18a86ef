use crate::*;
use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

const VALID_LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];
const VALID_LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("server.host '{0}' is not a valid hostname or IP address")]
    InvalidHost(String),

    #[error("database.url '{0}' must start with 'sqlite:'")]
    InvalidDatabaseUrl(String),

    #[error("database.max_connections must be a positive integer")]
    InvalidMaxConnections,

    #[error("queries.cutoff_date '{date}' is not a yyyy-mm-dd date: {message}")]
    InvalidCutoffDate { date: String, message: String },

    #[error("queries.tobs_station must not be empty")]
    EmptyStation,

    #[error("logging.format '{0}' must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("logging.level '{0}' must be one of: trace, debug, info, warn, error, off")]
    InvalidLogLevel(String),

    #[error("Environment variable placeholder in '{field}' was not resolved")]
    UnresolvedEnvVar { field: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &SurfsUpConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_server(&config.server, &mut report);
    validate_database(&config.database, &mut report);
    validate_queries(&config.queries, &mut report);
    validate_logging(&config.logging, &mut report);

    report
}

fn check_env_placeholder(field: &str, value: &str, report: &mut ValidationReport) -> bool {
    if has_unresolved_env_vars(value) {
        report.add_error(ValidationError::UnresolvedEnvVar {
            field: field.to_string(),
        });
        return true;
    }
    false
}

fn validate_server(server: &ServerSection, report: &mut ValidationReport) {
    if check_env_placeholder("server.host", &server.host, report) {
        return;
    }

    let host_ok = server.host.parse::<std::net::IpAddr>().is_ok()
        || Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9\-]{0,62})(\.[A-Za-z0-9]([A-Za-z0-9\-]{0,62}))*$")
            .map(|re| re.is_match(&server.host))
            .unwrap_or(false);
    if !host_ok {
        report.add_error(ValidationError::InvalidHost(server.host.clone()));
    }

    if server.port == 0 {
        report.add_warning("server.port", "Port 0 binds an ephemeral port chosen by the OS");
    }
}

fn validate_database(database: &DatabaseConfig, report: &mut ValidationReport) {
    if !check_env_placeholder("database.url", &database.url, report)
        && !database.url.starts_with("sqlite:")
    {
        report.add_error(ValidationError::InvalidDatabaseUrl(database.url.clone()));
    }

    if database.max_connections == 0 {
        report.add_error(ValidationError::InvalidMaxConnections);
    }
}

fn validate_queries(queries: &QueriesConfig, report: &mut ValidationReport) {
    match &queries.cutoff_date {
        Some(date) => {
            if !check_env_placeholder("queries.cutoff_date", date, report) {
                if let Err(e) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                    report.add_error(ValidationError::InvalidCutoffDate {
                        date: date.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        None => {
            report.add_warning(
                "queries.cutoff_date",
                "Not set; derived as one year before the latest measurement",
            );
            report.add_default("queries.cutoff_date", "<latest date - 12 months>");
        }
    }

    match &queries.tobs_station {
        Some(station) => {
            let unresolved = check_env_placeholder("queries.tobs_station", station, report);
            if !unresolved && station.trim().is_empty() {
                report.add_error(ValidationError::EmptyStation);
            }
        }
        None => {
            report.add_warning(
                "queries.tobs_station",
                "Not set; derived as the station with the most measurements",
            );
            report.add_default("queries.tobs_station", "<most active station>");
        }
    }
}

fn validate_logging(logging: &LoggingConfig, report: &mut ValidationReport) {
    if !VALID_LOG_FORMATS.contains(&logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }

    // Directives like `climate=debug,info` are passed through to the filter as-is.
    let level = logging.level.to_lowercase();
    let is_directive = level.contains('=') || level.contains(',');
    if !is_directive && !VALID_LOG_LEVELS.contains(&level.as_str()) {
        report.add_error(ValidationError::InvalidLogLevel(logging.level.clone()));
    }
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    5000
}

pub fn default_database_url() -> String {
    "sqlite://Resources/hawaii.sqlite".to_string()
}

pub fn default_max_connections() -> u32 {
    5
}

pub fn default_cutoff_date() -> Option<String> {
    Some("2016-08-23".to_string())
}

pub fn default_tobs_station() -> Option<String> {
    Some("USC00519281".to_string())
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

//! Logging initialization and configuration
//!
//! Sets up the tracing subscriber in one of three output formats. `RUST_LOG`
//! always wins over the configured level.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
    /// Single-line human-readable format
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown log format: {}", s))
    }
}

/// Filter from `RUST_LOG`, falling back to `default_level`.
pub fn build_filter(default_level: &str) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("Invalid log level: {}", default_level)),
    }
}

/// Initialize the logging system
///
/// # Arguments
///
/// * `service_name` - Name of the service for log identification
/// * `format` - Output format (pretty, json, or compact)
/// * `default_level` - Filter directive used when `RUST_LOG` is unset
///   (e.g., `info`, `climate=debug,info`)
pub fn init_logging(
    service_name: &str,
    format: LogFormat,
    default_level: &str,
) -> anyhow::Result<()> {
    let env_filter = build_filter(default_level)?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(true),
            )
            .try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    }
    .context("Failed to install tracing subscriber")?;

    tracing::info!(
        service = service_name,
        format = ?format,
        level = default_level,
        "Logging initialized"
    );

    Ok(())
}

/// Run `f` with a compact stderr subscriber installed for the current thread.
///
/// Covers the window before [`init_logging`], while the configuration that
/// selects the real format and level is still being loaded.
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    let filter = build_filter("info").unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr));

    tracing::subscriber::with_default(subscriber, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse("verbose"), None);

        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("verbose".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_bootstrap_logging_returns_closure_value() {
        let value = with_bootstrap_logging(|| {
            tracing::warn!("emitted while bootstrapping");
            42
        });
        assert_eq!(value, 42);
    }

    #[test]
    fn test_build_filter() {
        if std::env::var("RUST_LOG").is_err() {
            assert!(build_filter("climate=debug,info").is_ok());
            assert!(build_filter("climate=notalevel").is_err());
        }
    }
}

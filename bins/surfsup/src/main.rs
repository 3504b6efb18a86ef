//! SurfsUp CLI and Server Binary
//!
//! Entry point for the climate API. Provides commands for initializing,
//! validating, and starting the server.

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::Router;
use climate::{
    climate_routes, resolve_query_defaults, ClimateApiState, ClimateStore, QueryDefaults,
    SqliteClimateStore,
};
use cli::{Cli, Commands};
use config::{generate_default_config, load_config, save_config, validate_config, SurfsUpConfig};
use observability::{init_logging, with_bootstrap_logging, LogFormat};
use server::{
    health_routes, ConnectionStatus, HealthProbe, HealthState, HttpServer, ServerConfig,
    ServerExt, ShutdownController,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const SERVICE_NAME: &str = "surfsup";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start {
            config,
            port,
            database,
        } => start_server(config, port, database).await,
        Commands::Validate { config } => {
            init_logging(SERVICE_NAME, LogFormat::Pretty, "info")?;
            info!("Executing 'validate' command");
            validate_command(config).await
        }
        Commands::Init { output } => {
            init_logging(SERVICE_NAME, LogFormat::Pretty, "info")?;
            info!("Executing 'init' command");
            init_command(output).await
        }
    }
}

/// Reports dataset reachability on `/health`.
struct DatabaseProbe {
    store: Arc<dyn ClimateStore>,
}

#[async_trait]
impl HealthProbe for DatabaseProbe {
    async fn check(&self) -> ConnectionStatus {
        let started = Instant::now();
        let result = self.store.ping().await;
        ConnectionStatus::from_result("database", started, result)
    }
}

/// Climate routes plus `/health`.
fn build_app(store: Arc<dyn ClimateStore>, defaults: QueryDefaults) -> Router {
    let health = HealthState::new(SERVICE_NAME).with_probe(Arc::new(DatabaseProbe {
        store: store.clone(),
    }));
    let state = Arc::new(ClimateApiState::new(store, defaults));

    climate_routes(state).merge(health_routes(Arc::new(health)))
}

/// Load and validate configuration, then apply CLI overrides.
fn prepare_config(
    config_path: &Path,
    port_override: Option<u16>,
    database_override: Option<String>,
) -> Result<SurfsUpConfig> {
    let mut config = load_config(config_path)?;

    if let Some(port) = port_override {
        config.server.port = port;
    }
    if let Some(url) = database_override {
        config.database.url = url;
    }

    let report = validate_config(&config);

    if !report.warnings.is_empty() {
        warn!("Configuration warnings:");
        for warning in &report.warnings {
            warn!(field = %warning.field, message = %warning.message);
        }
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        anyhow::bail!(
            "Cannot start server due to configuration errors: {}",
            errors.join("; ")
        );
    }

    Ok(config)
}

async fn start_server<P: AsRef<Path>>(
    config_path: P,
    port_override: Option<u16>,
    database_override: Option<String>,
) -> Result<()> {
    // The configured subscriber depends on the file being loaded
    let config = with_bootstrap_logging(|| {
        prepare_config(config_path.as_ref(), port_override, database_override)
    })?;

    let format = LogFormat::parse(&config.logging.format).unwrap_or_default();
    init_logging(SERVICE_NAME, format, &config.logging.level)?;
    debug!(?config, "Configuration loaded");

    let store = SqliteClimateStore::connect(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("Cannot open dataset at {}", config.database.url))?;
    let store = Arc::new(store);

    let defaults = resolve_query_defaults(
        store.as_ref(),
        config.queries.cutoff_date.clone(),
        config.queries.tobs_station.clone(),
    )
    .await
    .context("Cannot resolve query parameters")?;

    info!(
        cutoff_date = %defaults.cutoff_date,
        tobs_station = %defaults.tobs_station,
        "Query parameters resolved"
    );

    let app = build_app(store.clone(), defaults);
    let server = HttpServer::new(
        ServerConfig::new(config.server.host.clone(), config.server.port),
        app,
    );

    let shutdown = ShutdownController::with_signals();
    let result = server.spawn_with(shutdown.child_token()).await;

    store.close().await;
    result.context("HTTP server task failed")??;

    info!("SurfsUp stopped");
    Ok(())
}

async fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Listen: {}:{}", config.server.host, config.server.port);
    println!("Database: {}", config.database.url);
    println!(
        "Cutoff date: {}",
        config.queries.cutoff_date.as_deref().unwrap_or("<derived>")
    );
    println!(
        "Temperature station: {}",
        config.queries.tobs_station.as_deref().unwrap_or("<derived>")
    );

    Ok(())
}

async fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();
    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Point database.url at your copy of hawaii.sqlite");
    println!(
        "  2. Run 'surfsup validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'surfsup start --config {:?}' to start the server",
        output_path
    );

    Ok(())
}

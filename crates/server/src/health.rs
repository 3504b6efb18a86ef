//! Health check endpoints
//!
//! Dependencies register a [`HealthProbe`]; `GET /health` runs every probe on
//! each request and reports `degraded` with a 503 when any of them fails.

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// Health check body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub connections: Vec<ConnectionStatus>,
}

/// Status of one dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub service: String,
    pub connected: bool,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

impl ConnectionStatus {
    /// Build a status from a probe outcome and the time it took
    pub fn from_result<E: std::fmt::Display>(
        service: impl Into<String>,
        started: Instant,
        result: std::result::Result<(), E>,
    ) -> Self {
        let latency_ms = Some(started.elapsed().as_millis() as u64);
        match result {
            Ok(()) => Self {
                service: service.into(),
                connected: true,
                latency_ms,
                error: None,
            },
            Err(e) => Self {
                service: service.into(),
                connected: false,
                latency_ms,
                error: Some(e.to_string()),
            },
        }
    }
}

/// A dependency whose reachability is part of service health
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Check the dependency once
    async fn check(&self) -> ConnectionStatus;
}

/// Shared state for health checks
#[derive(Clone)]
pub struct HealthState {
    pub service_name: String,
    pub start_time: Instant,
    probes: Vec<Arc<dyn HealthProbe>>,
}

impl HealthState {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            start_time: Instant::now(),
            probes: Vec::new(),
        }
    }

    /// Register a dependency probe
    pub fn with_probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Run every probe
    pub async fn check_all(&self) -> Vec<ConnectionStatus> {
        let mut connections = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            connections.push(probe.check().await);
        }
        connections
    }

    /// Assemble the health body from the current probe results
    pub async fn status(&self) -> HealthStatus {
        let connections = self.check_all().await;
        let healthy = connections.iter().all(|c| c.connected);

        HealthStatus {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            service: self.service_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
            uptime_seconds: self.uptime_seconds(),
            connections,
        }
    }
}

/// Health check handler running registered probes
pub async fn health_handler(
    State(state): State<Arc<HealthState>>,
) -> (StatusCode, Json<HealthStatus>) {
    let status = state.status().await;
    let code = if status.status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

/// Simple health handler without state
pub async fn simple_health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Create health check router
pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

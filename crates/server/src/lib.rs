//! Server infrastructure for SurfsUp
//!
//! This crate owns the HTTP listener: binding, request tracing, health
//! checks and graceful shutdown. Route definitions live with the domain
//! crates and are handed in as an `axum::Router`.
//!
//! # Architecture
//!
//! [`HttpServer`] implements the [`Server`] trait; [`ServerExt`] adds
//! `spawn_with()`. Shutdown is coordinated by [`ShutdownController`], whose
//! child `CancellationToken`s stop the listener on Ctrl+C or SIGTERM.
//!
//! # Quick Start
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, ServerExt, ShutdownController};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::new("127.0.0.1", 5000);
//!     let server = HttpServer::new(config, router);
//!     let shutdown = ShutdownController::with_signals();
//!     server.spawn_with(shutdown.child_token()).await??;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod shutdown;
pub mod traits;

// Re-exports for convenience
pub use config::{ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use error::{Result, ServerError};
pub use health::{health_routes, ConnectionStatus, HealthProbe, HealthState, HealthStatus};
pub use http::HttpServer;
pub use shutdown::ShutdownController;
pub use traits::{Server, ServerExt};

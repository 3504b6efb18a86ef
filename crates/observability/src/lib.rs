//! Observability infrastructure for SurfsUp
//!
//! Structured logging via `tracing`.
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, with_bootstrap_logging, LogFormat};
//!
//! let config = with_bootstrap_logging(|| load_config(path))?;
//! init_logging("surfsup", LogFormat::Pretty, &config.logging.level)?;
//! ```

pub mod logging;

pub use logging::{build_filter, init_logging, with_bootstrap_logging, LogFormat};

//! GenFren API - HTTP front for card verification.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      GENFREN API                          │
//! ├──────────────────────────────────────────────────────────┤
//! │  POST /api/verify-genlayer    POST /api/verify            │
//! │  GET  /health                 GET  /metrics               │
//! │            │                                              │
//! │  ┌─────────┴──────────────────────────────┐               │
//! │  │  Middleware: CORS → Tracing → BodyLimit │               │
//! │  └─────────┬──────────────────────────────┘               │
//! │            │                                              │
//! │  ┌─────────┴─────────┐    failure    ┌──────────────┐     │
//! │  │ VerificationGateway├─────────────►│ MockResolver │     │
//! │  └─────────┬─────────┘               └──────────────┘     │
//! └────────────┼─────────────────────────────────────────────┘
//!              │ JSON-RPC sim_call
//!              ▼
//!        GenLayer node
//! ```
//!
//! The remote endpoint never fails the request: any gateway error is
//! replaced by a mock outcome tagged `source: "mock"`.
//!
//! # Usage
//!
//! ```ignore
//! use genfren_api::{ApiConfig, ApiService};
//!
//! let config = ApiConfig::from_env()?;
//! let service = ApiService::new(config)?;
//! service.serve(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod service;
pub mod telemetry;

// Re-exports for public API
pub use domain::config::{ApiConfig, CorsConfig, HttpConfig, LimitsConfig};
pub use domain::error::{ApiError, ServiceError};
pub use handlers::{AppState, Source, VerifyResponse};
pub use middleware::{ApiMetrics, RequestId, REQUEST_ID_HEADER};
pub use service::ApiService;
pub use telemetry::{init_logging, LogConfig, TelemetryError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

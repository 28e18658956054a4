//! Domain types for the HTTP API.

pub mod config;
pub mod error;

pub use config::{ApiConfig, ConfigError, CorsConfig, HttpConfig, LimitsConfig};
pub use error::{ApiError, ServiceError};

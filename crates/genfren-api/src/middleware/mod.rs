//! HTTP middleware.
//!
//! Layer order, outermost first:
//! 1. CORS
//! 2. Request tracing (request id, `api_request` span)
//! 3. Body size limit

pub mod cors;
pub mod metrics;
pub mod tracing;

pub use cors::create_cors_layer;
pub use metrics::ApiMetrics;
pub use self::tracing::{RequestId, TracingLayer, REQUEST_ID_HEADER};

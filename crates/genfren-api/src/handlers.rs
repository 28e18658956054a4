//! Route handlers.
//!
//! `verify_genlayer` always answers with an outcome: any gateway failure is
//! replaced by a mock outcome tagged `source: "mock"`. Only a body without
//! usable `name` and `role` is an error.

use crate::domain::error::ApiError;
use crate::middleware::ApiMetrics;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use genfren_verifier::{
    simple_mock_verdict, MockResolver, SimpleVerdict, VerificationApi, VerificationOutcome,
    VerificationRequest,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn VerificationApi>,
    pub mock: Arc<MockResolver>,
    pub metrics: Arc<ApiMetrics>,
}

/// Where an outcome came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Genlayer,
    Mock,
}

/// Body of a successful `/api/verify-genlayer` response.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub data: VerificationOutcome,
    pub source: Source,
}

impl VerifyResponse {
    fn new(data: VerificationOutcome, source: Source) -> Self {
        Self {
            success: true,
            data,
            source,
        }
    }
}

/// `POST /api/verify-genlayer`
pub async fn verify_genlayer(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<VerifyResponse>, ApiError> {
    let Some(request) = parse_request(&body) else {
        state.metrics.record_bad_request();
        return Err(ApiError::MissingFields);
    };
    state.metrics.record_verify_request();

    match state.verifier.verify(&request).await {
        Ok(decoded) => {
            state.metrics.record_genlayer_success(decoded.is_strict());
            let nickname = state.mock.nickname_for(request.role());
            let outcome = decoded.into_outcome().with_nickname(nickname);
            Ok(Json(VerifyResponse::new(outcome, Source::Genlayer)))
        }
        Err(err) => {
            let kind = err.kind();
            if err.is_provider_unavailable() {
                info!("GenLayer AI provider unavailable, using mock verification");
            } else {
                warn!(kind = kind.as_str(), error = %err, "GenLayer call failed, using mock verification");
            }
            state
                .metrics
                .record_fallback(kind, err.is_provider_unavailable());

            let outcome = state.mock.resolve_request(&request);
            Ok(Json(VerifyResponse::new(outcome, Source::Mock)))
        }
    }
}

/// `POST /api/verify`: the length-only mock rule. Never fails; an
/// unreadable body counts as an empty name.
pub async fn verify_mock(State(state): State<AppState>, body: Bytes) -> Json<SimpleVerdict> {
    state.metrics.record_mock_request();
    let value: Option<Value> = serde_json::from_slice(&body).ok();
    let name = value
        .as_ref()
        .and_then(|v| v.get("name"))
        .and_then(Value::as_str);
    Json(simple_mock_verdict(name))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "genfren-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Metrics endpoint
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}

/// Fallback for unsupported methods on known routes
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// `name` and `role` must both be non-empty strings.
fn parse_request(body: &[u8]) -> Option<VerificationRequest> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let name = non_empty_str(&value, "name")?;
    let role = non_empty_str(&value, "role")?;
    Some(VerificationRequest::new(name, role))
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key)?.as_str().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let req = parse_request(br#"{"name":"Alice","role":"neuron"}"#).unwrap();
        assert_eq!(req.name(), "Alice");
        assert_eq!(req.role_label(), "neuron");

        // Unknown roles pass through; the resolver decides
        assert!(parse_request(br#"{"name":"Alice","role":"molecule"}"#).is_some());
    }

    #[test]
    fn test_parse_request_rejects_missing_fields() {
        let bodies: [&[u8]; 8] = [
            br#"{"name":"Alice"}"#,
            br#"{"role":"brain"}"#,
            br#"{"name":"","role":"brain"}"#,
            br#"{"name":null,"role":"brain"}"#,
            br#"{"name":42,"role":"brain"}"#,
            br#"["Alice","brain"]"#,
            b"not json",
            b"",
        ];
        for body in bodies {
            assert!(parse_request(body).is_none(), "{:?}", String::from_utf8_lossy(body));
        }
    }

    #[test]
    fn test_source_wire_names() {
        assert_eq!(serde_json::to_value(Source::Genlayer).unwrap(), "genlayer");
        assert_eq!(serde_json::to_value(Source::Mock).unwrap(), "mock");
    }
}

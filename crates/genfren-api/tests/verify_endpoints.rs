//! Router-level tests for the verification endpoints.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use genfren_api::{ApiConfig, ApiService, REQUEST_ID_HEADER};
use genfren_verifier::{
    Decoded, ExecutionFault, GatewayError, MockResolver, Role, TransportError, Verdict,
    VerificationApi, VerificationOutcome, VerificationRequest,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Verifier returning a fixed result and counting calls.
struct FixedVerifier {
    result: Result<Decoded, GatewayError>,
    calls: AtomicUsize,
}

impl FixedVerifier {
    fn new(result: Result<Decoded, GatewayError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VerificationApi for FixedVerifier {
    async fn verify(&self, _request: &VerificationRequest) -> Result<Decoded, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn router_with(verifier: Arc<dyn VerificationApi>) -> Router {
    ApiService::with_verifier(ApiConfig::default(), verifier)
        .unwrap()
        .router()
}

fn unconfigured_router() -> Router {
    ApiService::new(ApiConfig::default()).unwrap().router()
}

async fn post_json(router: Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    router.oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn neuron_nicknames() -> Vec<String> {
    MockResolver::default()
        .nicknames()
        .candidates(Role::Neuron)
        .to_vec()
}

#[tokio::test]
async fn test_unconfigured_gateway_falls_back_to_mock() {
    let response = post_json(
        unconfigured_router(),
        "/api/verify-genlayer",
        json!({"name": "Alice", "role": "neuron"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "mock");
    assert_eq!(body["data"]["verified"], true);
    assert_eq!(body["data"]["verdict"], "VERIFIED");
    assert!(body["data"]["reason"]
        .as_str()
        .unwrap()
        .starts_with("Alice "));

    let nickname = body["data"]["nickname"].as_str().unwrap().to_string();
    assert!(neuron_nicknames().contains(&nickname), "{nickname}");
}

#[tokio::test]
async fn test_mock_fallback_rejects_unknown_role() {
    let response = post_json(
        unconfigured_router(),
        "/api/verify-genlayer",
        json!({"name": "Alice", "role": "molecule"}),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["source"], "mock");
    assert_eq!(body["data"]["verdict"], "REJECTED");
    assert_eq!(body["data"]["verified"], false);
    assert_eq!(body["data"]["nickname"], "");
}

#[tokio::test]
async fn test_every_gateway_failure_falls_back() {
    let failures = [
        GatewayError::Transport(TransportError::Http("connection refused".into())),
        GatewayError::Execution {
            fault: ExecutionFault::ProviderUnavailable,
            message: "Verification error: 6: forbidden".into(),
        },
        GatewayError::Execution {
            fault: ExecutionFault::Contract,
            message: "Unknown error".into(),
        },
    ];

    for failure in failures {
        let verifier = FixedVerifier::new(Err(failure));
        let response = post_json(
            router_with(verifier.clone()),
            "/api/verify-genlayer",
            json!({"name": "Bob", "role": "brain"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(verifier.calls(), 1);

        let body = body_json(response).await;
        assert_eq!(body["source"], "mock");
        assert_eq!(body["data"]["verdict"], "VERIFIED");
    }
}

#[tokio::test]
async fn test_remote_outcome_gets_table_nickname() {
    let outcome = VerificationOutcome::rejected("Name: taken").with_nickname("Remote Name");
    let verifier = FixedVerifier::new(Ok(Decoded::Strict(outcome)));
    let response = post_json(
        router_with(verifier.clone()),
        "/api/verify-genlayer",
        json!({"name": "Alice", "role": "neuron"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["source"], "genlayer");
    assert_eq!(body["data"]["verdict"], "REJECTED");
    assert_eq!(body["data"]["verified"], false);
    assert_eq!(body["data"]["reason"], "Name: taken");

    let nickname = body["data"]["nickname"].as_str().unwrap().to_string();
    assert!(neuron_nicknames().contains(&nickname), "{nickname}");
}

#[tokio::test]
async fn test_remote_outcome_with_unknown_role_gets_generic_nickname() {
    let outcome = VerificationOutcome::new(Verdict::Unknown, "");
    let verifier = FixedVerifier::new(Ok(Decoded::Heuristic(outcome)));
    let response = post_json(
        router_with(verifier),
        "/api/verify-genlayer",
        json!({"name": "Alice", "role": "molecule"}),
    )
    .await;

    let body = body_json(response).await;
    assert_eq!(body["source"], "genlayer");
    assert_eq!(body["data"]["verdict"], "UNKNOWN");
    assert_eq!(body["data"]["nickname"], "GenFren Champion");
}

#[tokio::test]
async fn test_missing_fields_is_bad_request() {
    let verifier = FixedVerifier::new(Ok(Decoded::Strict(VerificationOutcome::default())));
    let bodies = [
        json!({"name": "Alice"}),
        json!({"role": "neuron"}),
        json!({"name": "", "role": "neuron"}),
        json!({}),
    ];

    for body in bodies {
        let response = post_json(router_with(verifier.clone()), "/api/verify-genlayer", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body, json!({"error": "Missing name or role"}));
    }
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_simple_mock_endpoint() {
    let cases = [
        (json!({"name": ""}), false, "Empty name"),
        (json!({"name": "   "}), false, "Empty name"),
        (json!({}), false, "Empty name"),
        (json!({"name": "Al"}), false, "Name too short"),
        (json!({"name": "Alice"}), true, "Mock verified"),
    ];

    for (body, verified, reason) in cases {
        let response = post_json(unconfigured_router(), "/api/verify", body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["verified"], verified);
        assert_eq!(body["verdict"], if verified { "VERIFIED" } else { "REJECTED" });
        assert_eq!(body["reason"], reason);
        assert!(body.get("nickname").is_none());
    }
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    for uri in ["/api/verify-genlayer", "/api/verify"] {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = unconfigured_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body, json!({"error": "Method not allowed"}));
    }
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/verify-genlayer")
        .header(header::ORIGIN, "https://genfren.app")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = unconfigured_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_request_id_echoed() {
    let response = post_json(unconfigured_router(), "/api/verify", json!({"name": "Alice"})).await;
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let id = "0190b6b0-8a2c-7000-8000-000000000001";
    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, id)
        .body(Body::empty())
        .unwrap();
    let response = unconfigured_router().oneshot(request).await.unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], id);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = ApiConfig::default();
    config.limits.max_body_bytes = 64;
    let router = ApiService::new(config).unwrap().router();

    let body = json!({"name": "A".repeat(256), "role": "neuron"}).to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/verify-genlayer")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = unconfigured_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "genfren-api");
}

#[tokio::test]
async fn test_metrics_track_fallbacks() {
    let service = ApiService::new(ApiConfig::default()).unwrap();
    let metrics = service.metrics();
    let router = service.router();

    post_json(
        router.clone(),
        "/api/verify-genlayer",
        json!({"name": "Alice", "role": "neuron"}),
    )
    .await;
    post_json(router.clone(), "/api/verify-genlayer", json!({"name": "Alice"})).await;
    post_json(router.clone(), "/api/verify", json!({"name": "Al"})).await;

    assert_eq!(metrics.fallbacks_total(), 1);

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let body = body_json(router.oneshot(request).await.unwrap()).await;
    assert_eq!(body["verify"]["requests"], 1);
    assert_eq!(body["verify"]["bad_requests"], 1);
    assert_eq!(body["fallbacks"]["configuration"], 1);
    assert_eq!(body["mock"]["requests"], 1);
}

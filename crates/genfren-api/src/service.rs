//! API service - router construction and server lifecycle.

use crate::domain::config::ApiConfig;
use crate::domain::error::ServiceError;
use crate::handlers::{
    health_check, method_not_allowed, metrics, verify_genlayer, verify_mock, AppState,
};
use crate::middleware::{create_cors_layer, ApiMetrics, TracingLayer};
use axum::routing::{get, post};
use axum::Router;
use genfren_verifier::{HttpRpcTransport, MockResolver, VerificationApi, VerificationGateway};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};

/// GenFren API service state
pub struct ApiService {
    config: ApiConfig,
    state: AppState,
}

impl ApiService {
    /// Create the service with the HTTP JSON-RPC gateway.
    pub fn new(config: ApiConfig) -> Result<Self, ServiceError> {
        let gateway = VerificationGateway::new(
            config.verifier.clone(),
            Arc::new(HttpRpcTransport::new()),
        );
        Self::with_verifier(config, Arc::new(gateway))
    }

    /// Create the service around any verifier implementation.
    pub fn with_verifier(
        config: ApiConfig,
        verifier: Arc<dyn VerificationApi>,
    ) -> Result<Self, ServiceError> {
        config.validate()?;

        if let Err(e) = config.verifier.resolve() {
            warn!(error = %e, "GenLayer not configured, every request will use mock verification");
        }

        let state = AppState {
            verifier,
            mock: Arc::new(MockResolver::default()),
            metrics: Arc::new(ApiMetrics::new()),
        };

        Ok(Self { config, state })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<ApiMetrics> {
        Arc::clone(&self.state.metrics)
    }

    /// Build the HTTP router.
    ///
    /// Layers are added innermost first: body limit, then tracing, then CORS.
    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/api/verify-genlayer",
                post(verify_genlayer).fallback(method_not_allowed),
            )
            .route("/api/verify", post(verify_mock).fallback(method_not_allowed))
            .route("/health", get(health_check))
            .route("/metrics", get(metrics))
            .layer(RequestBodyLimitLayer::new(self.config.limits.max_body_bytes))
            .layer(TracingLayer::new())
            .layer(create_cors_layer(&self.config.cors))
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServiceError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr).await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServiceError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(addr = %addr, "Starting GenFren API");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("GenFren API stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = ApiConfig::default();
        config.limits.max_body_bytes = 0;
        assert!(matches!(
            ApiService::new(config),
            Err(ServiceError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_serve_on_stops_on_shutdown() {
        let service = ApiService::new(ApiConfig::default()).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(service.serve_on(listener, async {
            let _ = rx.await;
        }));

        let stream = tokio::net::TcpStream::connect(addr).await;
        assert!(stream.is_ok());
        drop(stream);

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}

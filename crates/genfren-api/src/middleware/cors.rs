//! CORS from [`CorsConfig`] over tower-http.

use crate::domain::config::CorsConfig;
use axum::http::{HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Create CORS layer from API config
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        // No CORS headers at all; browsers fall back to same-origin
        return CorsLayer::new();
    }

    let mut cors = CorsLayer::new();

    if config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    cors.allow_headers(headers)
        .expose_headers([HeaderName::from_static(super::REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(config.max_age))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_builds_from_config() {
        let _ = create_cors_layer(&CorsConfig::default());

        let config = CorsConfig {
            allowed_origins: vec!["https://genfren.app".into(), "not a header\n".into()],
            ..CorsConfig::default()
        };
        let _ = create_cors_layer(&config);

        let disabled = CorsConfig {
            enabled: false,
            ..CorsConfig::default()
        };
        let _ = create_cors_layer(&disabled);
    }
}

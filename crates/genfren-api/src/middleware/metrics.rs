//! Request and fallback counters, served as JSON on `/metrics`.

use genfren_verifier::FailureKind;
use std::sync::atomic::{AtomicU64, Ordering};

/// API metrics
#[derive(Debug, Default)]
pub struct ApiMetrics {
    // Remote verification endpoint
    pub verify_requests: AtomicU64,
    pub genlayer_success: AtomicU64,
    pub heuristic_decodes: AtomicU64,
    pub bad_requests: AtomicU64,

    // Fallbacks by failure kind
    pub fallback_configuration: AtomicU64,
    pub fallback_transport: AtomicU64,
    pub fallback_execution: AtomicU64,
    pub fallback_provider_unavailable: AtomicU64,

    // Simple mock endpoint
    pub mock_requests: AtomicU64,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_verify_request(&self) {
        self.verify_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bad_request(&self) {
        self.bad_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a remote outcome; `strict` is false for text-scanned results
    pub fn record_genlayer_success(&self, strict: bool) {
        self.genlayer_success.fetch_add(1, Ordering::Relaxed);
        if !strict {
            self.heuristic_decodes.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a mock substitution after a gateway failure
    pub fn record_fallback(&self, kind: FailureKind, provider_unavailable: bool) {
        let counter = match kind {
            FailureKind::Configuration => &self.fallback_configuration,
            FailureKind::Transport => &self.fallback_transport,
            FailureKind::Execution => &self.fallback_execution,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        if provider_unavailable {
            self.fallback_provider_unavailable
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_mock_request(&self) {
        self.mock_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Total mock substitutions across all kinds
    pub fn fallbacks_total(&self) -> u64 {
        self.fallback_configuration.load(Ordering::Relaxed)
            + self.fallback_transport.load(Ordering::Relaxed)
            + self.fallback_execution.load(Ordering::Relaxed)
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "verify": {
                "requests": self.verify_requests.load(Ordering::Relaxed),
                "genlayer_success": self.genlayer_success.load(Ordering::Relaxed),
                "heuristic_decodes": self.heuristic_decodes.load(Ordering::Relaxed),
                "bad_requests": self.bad_requests.load(Ordering::Relaxed),
            },
            "fallbacks": {
                "total": self.fallbacks_total(),
                "configuration": self.fallback_configuration.load(Ordering::Relaxed),
                "transport": self.fallback_transport.load(Ordering::Relaxed),
                "execution": self.fallback_execution.load(Ordering::Relaxed),
                "provider_unavailable": self.fallback_provider_unavailable.load(Ordering::Relaxed),
            },
            "mock": {
                "requests": self.mock_requests.load(Ordering::Relaxed),
            }
        })
    }
}

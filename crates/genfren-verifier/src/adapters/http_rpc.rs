//! JSON-RPC 2.0 over HTTP.

use crate::domain::errors::TransportError;
use crate::ports::outbound::{RpcTransport, SimCall, SimCallReceipt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

const SIM_CALL: &str = "sim_call";

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: [&'a SimCall; 1],
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// [`RpcTransport`] backed by a shared `reqwest::Client`.
///
/// No request timeout is set; a stalled node stalls the call.
#[derive(Debug, Default)]
pub struct HttpRpcTransport {
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpRpcTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, TLS roots, timeouts).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            next_id: AtomicU64::new(0),
        }
    }
}

#[async_trait::async_trait]
impl RpcTransport for HttpRpcTransport {
    async fn sim_call(
        &self,
        endpoint: &str,
        call: &SimCall,
    ) -> Result<SimCallReceipt, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method: SIM_CALL,
            params: [call],
        };

        let response = self
            .client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http(format!("unexpected status {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        debug!(id, status = %status, len = body.len(), "sim_call response received");

        let parsed: RpcResponse = serde_json::from_slice(&body)
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(TransportError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = parsed
            .result
            .ok_or_else(|| TransportError::MalformedResponse("missing result".into()))?;
        serde_json::from_value(result).map_err(|e| TransportError::MalformedResponse(e.to_string()))
    }
}

//! # Outbound Ports (Driven Ports / SPI)
//!
//! The chain node's `sim_call` JSON-RPC method, as seen by the gateway.

use crate::domain::errors::TransportError;
use serde::{Deserialize, Serialize};

/// Execution status the node reports for a successful call.
pub const EXECUTION_SUCCESS: &str = "SUCCESS";

/// Single parameter object of `sim_call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimCall {
    #[serde(rename = "type")]
    pub kind: String,
    pub to: String,
    pub from: String,
    /// `0x`-prefixed hex of the call envelope
    pub data: String,
}

impl SimCall {
    /// A state-changing call, simulated by the node.
    pub fn write(to: impl Into<String>, from: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: "write".to_string(),
            to: to.into(),
            from: from.into(),
            data: data.into(),
        }
    }
}

/// Diagnostics captured from the contract run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenVmResult {
    pub stdout: String,
    pub stderr: String,
}

/// Result object of `sim_call`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimCallReceipt {
    pub execution_result: Option<String>,
    /// Base64 of the contract's return bytes
    pub result: Option<String>,
    pub genvm_result: Option<GenVmResult>,
}

impl SimCallReceipt {
    pub fn succeeded(&self) -> bool {
        self.execution_result.as_deref() == Some(EXECUTION_SUCCESS)
    }

    /// Non-empty contract stderr, if any.
    pub fn stderr(&self) -> Option<&str> {
        self.genvm_result
            .as_ref()
            .map(|r| r.stderr.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// JSON-RPC transport to the chain node.
#[async_trait::async_trait]
pub trait RpcTransport: Send + Sync {
    /// Issue one `sim_call` to `endpoint`.
    ///
    /// # Errors
    /// * `TransportError::Http` - network failure or non-2xx status
    /// * `TransportError::Rpc` - the node returned a JSON-RPC error object
    /// * `TransportError::MalformedResponse` - body is not a JSON-RPC response
    async fn sim_call(&self, endpoint: &str, call: &SimCall)
        -> Result<SimCallReceipt, TransportError>;
}

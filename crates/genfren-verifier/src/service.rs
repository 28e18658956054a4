//! # Verification Gateway
//!
//! Application service implementing [`VerificationApi`] over an
//! [`RpcTransport`].
//!
//! ## Per-call phases
//!
//! ```text
//! Init ──→ Encoding ──→ Calling ──→ Decoding ──→ Succeeded
//!   │          │            │            │
//!   └──────────┴────────────┴────────────┴──────→ Failed
//! ```
//!
//! Nothing is retried and nothing is cached between calls.

use crate::domain::calldata;
use crate::domain::config::VerifierConfig;
use crate::domain::decoder::{Decoded, ResultDecoder};
use crate::domain::entities::VerificationRequest;
use crate::domain::errors::{ExecutionFault, GatewayError, TransportError};
use crate::ports::inbound::VerificationApi;
use crate::ports::outbound::{RpcTransport, SimCall, SimCallReceipt};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rlp::RlpStream;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// Contract method invoked for every submission.
pub const VERIFY_METHOD: &str = "verify_card";

/// Diagnostic the contract emits when its AI provider refuses the request.
const PROVIDER_UNAVAILABLE_MARKER: &str = "forbidden";

/// Message used when a failed execution carries no stderr.
const UNKNOWN_EXECUTION_ERROR: &str = "Unknown error";

/// Phase of a single gateway call, recorded on tracing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Init,
    Encoding,
    Calling,
    Decoding,
    Succeeded,
    Failed,
}

impl CallPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallPhase::Init => "init",
            CallPhase::Encoding => "encoding",
            CallPhase::Calling => "calling",
            CallPhase::Decoding => "decoding",
            CallPhase::Succeeded => "succeeded",
            CallPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote verification through the node's `sim_call`.
///
/// Configuration is checked on every call, so a gateway built from an empty
/// [`VerifierConfig`] is valid and fails each call with a configuration error.
pub struct VerificationGateway {
    config: VerifierConfig,
    transport: Arc<dyn RpcTransport>,
    decoder: ResultDecoder,
}

impl VerificationGateway {
    pub fn new(config: VerifierConfig, transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            config,
            transport,
            decoder: ResultDecoder::new(),
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    async fn run(&self, request: &VerificationRequest) -> Result<Decoded, GatewayError> {
        debug!(phase = %CallPhase::Init, "Resolving verifier config");
        let resolved = self.config.resolve()?;

        debug!(phase = %CallPhase::Encoding, "Encoding call envelope");
        let data = encode_envelope(request);
        let call = SimCall::write(
            resolved.contract_address.as_str(),
            resolved.caller.address_hex(),
            data,
        );

        debug!(phase = %CallPhase::Calling, endpoint = %resolved.rpc_url, "Sending sim_call");
        let receipt = self.transport.sim_call(&resolved.rpc_url, &call).await?;

        debug!(phase = %CallPhase::Decoding, "Decoding contract result");
        let raw = result_bytes(&receipt)?;
        let decoded = self.decoder.decode(&raw);

        if decoded.outcome().reason().contains(PROVIDER_UNAVAILABLE_MARKER) {
            return Err(GatewayError::Execution {
                fault: ExecutionFault::ProviderUnavailable,
                message: decoded.outcome().reason().to_string(),
            });
        }

        Ok(decoded)
    }
}

#[async_trait::async_trait]
impl VerificationApi for VerificationGateway {
    async fn verify(&self, request: &VerificationRequest) -> Result<Decoded, GatewayError> {
        let span = info_span!("verify_card", role = %request.role_label());
        let result = self.run(request).instrument(span).await;

        match &result {
            Ok(decoded) => info!(
                phase = %CallPhase::Succeeded,
                stage = decoded.stage(),
                verdict = %decoded.outcome().verdict(),
                "Remote verification completed"
            ),
            Err(err) => warn!(
                phase = %CallPhase::Failed,
                kind = err.kind().as_str(),
                error = %err,
                "Remote verification failed"
            ),
        }

        result
    }
}

/// `0x` + hex of `rlp([calldata({args: [name, role], method}), leader_only = 0])`.
pub fn encode_envelope(request: &VerificationRequest) -> String {
    let calldata = calldata::encode(&calldata::method_call(
        VERIFY_METHOD,
        [request.name(), request.role_label()],
    ));

    let mut stream = RlpStream::new_list(2);
    stream.append(&calldata);
    stream.append(&0u8);
    format!("0x{}", hex::encode(stream.out()))
}

/// Triage the receipt and extract the contract's return bytes.
fn result_bytes(receipt: &SimCallReceipt) -> Result<Vec<u8>, GatewayError> {
    if !receipt.succeeded() {
        let message = receipt.stderr().unwrap_or(UNKNOWN_EXECUTION_ERROR);
        let fault = if message.contains(PROVIDER_UNAVAILABLE_MARKER) {
            ExecutionFault::ProviderUnavailable
        } else {
            ExecutionFault::Contract
        };
        return Err(GatewayError::Execution {
            fault,
            message: message.to_string(),
        });
    }

    let encoded = receipt
        .result
        .as_deref()
        .ok_or_else(|| TransportError::MalformedResponse("receipt has no result".into()))?;

    BASE64
        .decode(encoded)
        .map_err(|e| TransportError::MalformedResponse(format!("result is not base64: {}", e)).into())
}

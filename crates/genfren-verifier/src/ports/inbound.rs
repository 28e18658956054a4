//! # Inbound Ports (Driving Ports / API)

use crate::domain::decoder::Decoded;
use crate::domain::entities::VerificationRequest;
use crate::domain::errors::GatewayError;

/// Remote verification of a single card submission.
///
/// Implementations make at most one external round trip per call and never
/// substitute a mock outcome themselves.
#[async_trait::async_trait]
pub trait VerificationApi: Send + Sync {
    /// Verify a submission against the external service.
    ///
    /// # Errors
    /// * `GatewayError::Configuration` - endpoint, contract or credential unusable; no call made
    /// * `GatewayError::Transport` - the node could not be reached or replied with garbage
    /// * `GatewayError::Execution` - the contract ran but did not succeed
    async fn verify(&self, request: &VerificationRequest) -> Result<Decoded, GatewayError>;
}

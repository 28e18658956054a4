//! # Verification Errors
//!
//! Error types for every layer of the verifier.
//!
//! Callers decide on fallback through [`GatewayError::kind`], never by
//! inspecting message text.

use thiserror::Error;

/// Errors from the calldata codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CalldataError {
    /// Input ended in the middle of a value
    #[error("unexpected end of calldata at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// A LEB128 number does not fit in 128 bits
    #[error("integer overflow in calldata at offset {offset}")]
    IntegerOverflow { offset: usize },

    /// Special-type header that is not null/false/true/address
    #[error("unknown special value {payload} at offset {offset}")]
    UnknownSpecial { payload: u128, offset: usize },

    /// Header carries the unassigned type tag
    #[error("unknown value type {ty} at offset {offset}")]
    UnknownType { ty: u8, offset: usize },

    /// String or map key is not valid UTF-8
    #[error("invalid utf-8 in calldata at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// The top-level value did not consume the whole buffer
    #[error("{remaining} trailing bytes after calldata value")]
    TrailingBytes { remaining: usize },

    /// Arrays or maps nested beyond the supported depth
    #[error("calldata nested deeper than {max} levels")]
    NestingTooDeep { max: usize },

    /// Two map entries share a key
    #[error("duplicate map key: {0}")]
    DuplicateKey(String),
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required setting absent or blank
    #[error("missing {0}")]
    Missing(&'static str),

    /// Setting present but unusable
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    /// Nickname table does not cover a role
    #[error("nickname table has no candidates for role '{0}'")]
    MissingNicknames(String),
}

/// Errors reaching the external verification service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Network failure or non-success HTTP status
    #[error("http error: {0}")]
    Http(String),

    /// The node answered with a JSON-RPC error object
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response could not be understood
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Why a reachable service failed to execute the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionFault {
    /// The contract's AI provider refused the request
    ProviderUnavailable,
    /// Any other non-success execution
    Contract,
}

/// Coarse classification used by callers to pick a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Configuration,
    Transport,
    Execution,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Configuration => "configuration",
            FailureKind::Transport => "transport",
            FailureKind::Execution => "execution",
        }
    }
}

/// Gateway failure. Every variant is recoverable by substituting a mock
/// outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Endpoint, contract or caller credential not configured
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Call did not reach the service or the reply was unusable
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Service reachable but execution did not succeed
    #[error("contract execution failed: {message}")]
    Execution {
        fault: ExecutionFault,
        message: String,
    },
}

impl GatewayError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GatewayError::Configuration(_) => FailureKind::Configuration,
            GatewayError::Transport(_) => FailureKind::Transport,
            GatewayError::Execution { .. } => FailureKind::Execution,
        }
    }

    pub fn is_provider_unavailable(&self) -> bool {
        matches!(
            self,
            GatewayError::Execution {
                fault: ExecutionFault::ProviderUnavailable,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let config = GatewayError::from(ConfigError::Missing("rpc_url"));
        assert_eq!(config.kind(), FailureKind::Configuration);
        assert!(config.to_string().contains("rpc_url"));

        let transport = GatewayError::from(TransportError::Http("connection refused".into()));
        assert_eq!(transport.kind(), FailureKind::Transport);

        let execution = GatewayError::Execution {
            fault: ExecutionFault::ProviderUnavailable,
            message: "6: forbidden".into(),
        };
        assert_eq!(execution.kind(), FailureKind::Execution);
        assert!(execution.is_provider_unavailable());
    }
}

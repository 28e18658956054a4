//! Verifier configuration with validation.
//!
//! Nothing is read from the environment inside the gateway. Callers build a
//! [`VerifierConfig`] (usually via [`VerifierConfig::from_env`]) and pass it
//! to the constructor.

use super::account::CallerAccount;
use super::errors::ConfigError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Environment variable for the node's JSON-RPC endpoint.
pub const ENV_RPC_URL: &str = "GENLAYER_RPC_URL";
/// Environment variable for the verification contract address.
pub const ENV_CONTRACT_ADDRESS: &str = "GENLAYER_CONTRACT_ADDRESS";
/// Environment variable for the caller's hex secret.
pub const ENV_CALLER_KEY: &str = "GENLAYER_CALLER_KEY";

/// Unvalidated connection settings. Every field may be absent; absence is
/// reported when the gateway is invoked, not at load time.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// JSON-RPC endpoint URL
    pub rpc_url: Option<String>,
    /// Verification contract address (`0x` + 40 hex)
    pub contract_address: Option<String>,
    /// Caller secret (hex, 32 bytes). Never serialized.
    #[serde(skip_serializing)]
    pub caller_key: Option<String>,
}

impl VerifierConfig {
    pub fn new(
        rpc_url: impl Into<String>,
        contract_address: impl Into<String>,
        caller_key: impl Into<String>,
    ) -> Self {
        Self {
            rpc_url: Some(rpc_url.into()),
            contract_address: Some(contract_address.into()),
            caller_key: Some(caller_key.into()),
        }
    }

    /// Load from `GENLAYER_RPC_URL`, `GENLAYER_CONTRACT_ADDRESS` and
    /// `GENLAYER_CALLER_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            rpc_url: lookup(ENV_RPC_URL),
            contract_address: lookup(ENV_CONTRACT_ADDRESS),
            caller_key: lookup(ENV_CALLER_KEY),
        }
    }

    /// Check presence first, then validity, field by field.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let rpc_url = required(&self.rpc_url, "rpc_url")?;
        let contract_address = required(&self.contract_address, "contract_address")?;
        let caller_key = required(&self.caller_key, "caller_key")?;

        let url = Url::parse(rpc_url).map_err(|e| ConfigError::Invalid {
            name: "rpc_url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                name: "rpc_url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if !is_address(contract_address) {
            return Err(ConfigError::Invalid {
                name: "contract_address",
                reason: "expected 0x followed by 40 hex digits".into(),
            });
        }

        Ok(ResolvedConfig {
            rpc_url: rpc_url.to_string(),
            contract_address: contract_address.to_string(),
            caller: CallerAccount::from_hex_key(caller_key)?,
        })
    }
}

impl fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifierConfig")
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("caller_key", &self.caller_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Validated settings for one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub rpc_url: String,
    pub contract_address: String,
    pub caller: CallerAccount,
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn is_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

//! # Caller Account
//!
//! The `from` address of simulated calls, derived from the injected secp256k1
//! secret. Only the address is retained.

use super::calldata::ADDRESS_LEN;
use super::errors::ConfigError;
use k256::ecdsa::{SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Account that signs outbound calls.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CallerAccount {
    address: [u8; ADDRESS_LEN],
}

impl CallerAccount {
    /// Parse a 32-byte hex secret, with or without `0x`.
    pub fn from_hex_key(key: &str) -> Result<Self, ConfigError> {
        let key = key.trim();
        let hex_part = key.strip_prefix("0x").unwrap_or(key);
        let bytes = hex::decode(hex_part).map_err(|e| invalid_key(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(invalid_key(format!("expected 32 bytes, got {}", bytes.len())));
        }
        let signing_key = SigningKey::from_slice(&bytes)
            .map_err(|_| invalid_key("not a valid secp256k1 scalar".to_string()))?;
        Ok(Self {
            address: address_from_pubkey(signing_key.verifying_key()),
        })
    }

    pub fn address(&self) -> [u8; ADDRESS_LEN] {
        self.address
    }

    /// `0x`-prefixed lowercase hex.
    pub fn address_hex(&self) -> String {
        format!("0x{}", hex::encode(self.address))
    }
}

// Never print key-derived material beyond the public address
impl fmt::Debug for CallerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallerAccount")
            .field("address", &self.address_hex())
            .finish()
    }
}

fn invalid_key(reason: String) -> ConfigError {
    ConfigError::Invalid {
        name: "caller_key",
        reason,
    }
}

/// Keccak-256 of the uncompressed public key without its `0x04` tag; the
/// address is the last 20 bytes.
fn address_from_pubkey(public_key: &VerifyingKey) -> [u8; ADDRESS_LEN] {
    let point = public_key.to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);

    let mut address = [0u8; ADDRESS_LEN];
    address.copy_from_slice(&hash[32 - ADDRESS_LEN..]);
    address
}

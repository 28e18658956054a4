//! # GenFren Card Verifier
//!
//! Resolves a card submission (name + role) into a verification outcome.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): roles, nicknames, the mock resolver, the
//!   calldata codec and the result decoder. Pure logic, no I/O.
//! - **Ports Layer** (`ports/`): the inbound verification API and the
//!   outbound JSON-RPC transport.
//! - **Adapters Layer** (`adapters/`): the `reqwest` implementation of the
//!   outbound transport.
//! - **Service Layer** (`service.rs`): the verification gateway that wires
//!   config, encoding, transport and decoding together.
//!
//! ## Control Flow
//!
//! ```text
//! caller ──verify(name, role)──→ VerificationGateway
//!                                    │ Init      (config present?)
//!                                    │ Encoding  (calldata → rlp envelope → 0x hex)
//!                                    │ Calling   (sim_call over JSON-RPC)
//!                                    │ Decoding  (base64 → ResultDecoder)
//!                                    ↓
//!                         Ok(Decoded) | Err(GatewayError)
//!
//! on Err: caller ──resolve(name, role)──→ MockResolver
//! ```
//!
//! The gateway never falls back on its own. Whether a failure is replaced by a
//! mock outcome is the caller's decision, driven by [`GatewayError::kind`].

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::http_rpc::HttpRpcTransport;
pub use domain::account::CallerAccount;
pub use domain::calldata::{self as calldata, CalldataValue};
pub use domain::config::{ResolvedConfig, VerifierConfig};
pub use domain::decoder::{decode, Decoded, ResultDecoder};
pub use domain::entities::{Role, Verdict, VerificationOutcome, VerificationRequest};
pub use domain::errors::{
    CalldataError, ConfigError, ExecutionFault, FailureKind, GatewayError, TransportError,
};
pub use domain::mock::{simple_mock_verdict, MockResolver, SimpleVerdict};
pub use domain::nicknames::{NicknameTable, GENERIC_NICKNAME};
pub use ports::inbound::VerificationApi;
pub use ports::outbound::{GenVmResult, RpcTransport, SimCall, SimCallReceipt};
pub use service::{encode_envelope, CallPhase, VerificationGateway};

//! # Adapters Layer
//!
//! - `http_rpc`: JSON-RPC over HTTP with `reqwest`

pub mod http_rpc;

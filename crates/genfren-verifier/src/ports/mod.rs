//! # Ports Layer
//!
//! - `inbound`: what the verifier offers to HTTP handlers
//! - `outbound`: what the verifier needs from the chain node

pub mod inbound;
pub mod outbound;

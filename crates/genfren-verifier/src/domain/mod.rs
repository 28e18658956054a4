//! # Domain Layer
//!
//! Pure verification logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod account;
pub mod calldata;
pub mod config;
pub mod decoder;
pub mod entities;
pub mod errors;
pub mod mock;
pub mod nicknames;

//! Shared primitives for the proxydir workspace
//!
//! This crate holds the pieces that both the directory core and any client
//! tooling must agree on:
//!
//! - [`wire`] - the handshake line format and the hex encoding of server
//!   entries
//! - [`validation`] - entity-id and region-code validation

pub mod validation;
pub mod wire;

pub use validation::{normalize_region, validate_entity_id, ValidationError, ValidationResult};
pub use wire::{decode_server_entry, encode_server_entry, ServerEntry, WireError};

//! BACnet protocol vocabulary in pure Rust.
//!
//! `rustbac-core` holds the identifiers, owned data values, and decoded
//! service payload shapes shared by the rustbac crate family, along with the
//! encoder that turns a property value into the tagged items a wire stack
//! serialises. It is `no_std` compatible and needs only `alloc`.
//!
//! # Feature flags
//!
//! - **`std`** (default) — enables `std::error::Error` implementations.
//! - **`serde`** — derives `Serialize`/`Deserialize` on core types.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Error types for value encoding.
pub mod error;
/// Decoded service request and response payloads.
pub mod services;
/// Core BACnet data types: object identifiers, property identifiers, and data values.
pub mod types;

pub use error::EncodeError;

//! Shared value types for the parkcard workspace.
//!
//! Holds the pieces every other crate agrees on: the single place where wire
//! byte order is decided ([`endian`]), the 4-byte card identifier and its
//! numeric view ([`CardUid`]), the client-type byte coupling
//! ([`ClientTypeCode`]), Mifare access parameters, and the common error type.

pub mod constants;
pub mod endian;
pub mod error;
pub mod mifare;
pub mod types;

pub use error::{Error, Result};
pub use mifare::{MifareKey, SectorNumber};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

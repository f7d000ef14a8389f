//! # PW-01 Address Codec
//!
//! Checksummed, human-readable rendering of 20-byte account identifiers.
//!
//! **Subsystem ID:** 01  
//! **Status:** Production-Ready
//!
//! ## Algorithm
//!
//! | Step | Description |
//! |------|-------------|
//! | Regroup | 20 bytes → 32 five-bit groups, MSB first, zero padded |
//! | Prefix expansion | high 3 bits, `0`, low 5 bits of each prefix byte |
//! | Checksum | 30-bit polymod over a 5-constant generator, 6 placeholders |
//! | Output | `prefix` + `1` + data + 6 checksum symbols |
//!
//! ## Module Structure
//!
//! ```text
//! pw-01-address-codec/
//! ├── checksum.rs   # polymod, prefix expansion, checksum create/verify
//! ├── convert.rs    # 8 <-> 5 bit regrouping
//! ├── codec.rs      # encode / encode_hex / decode / verify
//! └── errors.rs     # CodecError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checksum;
pub mod codec;
pub mod convert;
pub mod errors;

#[cfg(test)]
mod proptest;

// Re-exports
pub use checksum::{create_checksum, expand_prefix, polymod, verify_checksum, GENERATOR};
pub use codec::{
    decode, encode, encode_hex, parse_hex_identifier, verify, Identifier, ALPHABET,
    IDENTIFIER_LEN, SEPARATOR,
};
pub use convert::convert_bits;
pub use errors::CodecError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

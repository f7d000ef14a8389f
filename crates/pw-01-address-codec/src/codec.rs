//! # Address Encoding
//!
//! `prefix + "1" + data + checksum`, every 5-bit value mapped through
//! [`ALPHABET`].

use crate::checksum::{create_checksum, verify_checksum, CHECKSUM_LEN};
use crate::convert::convert_bits;
use crate::errors::CodecError;

/// The 32-symbol output alphabet.
pub const ALPHABET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Raw account identifier length in bytes.
pub const IDENTIFIER_LEN: usize = 20;

/// Maximum total address length.
pub const MAX_ADDRESS_LEN: usize = 90;

/// Separator between prefix and data.
pub const SEPARATOR: char = '1';

/// 20-byte raw account identifier.
pub type Identifier = [u8; IDENTIFIER_LEN];

fn check_prefix(prefix: &str) -> Result<(), CodecError> {
    let valid = !prefix.is_empty()
        && prefix.len() <= MAX_ADDRESS_LEN - 1 - CHECKSUM_LEN
        && prefix.bytes().all(|b| (33..=126).contains(&b) && !b.is_ascii_uppercase());
    if valid {
        Ok(())
    } else {
        Err(CodecError::InvalidPrefix(prefix.to_string()))
    }
}

fn alphabet_index(c: u8) -> Option<u8> {
    ALPHABET.iter().position(|a| *a == c).map(|i| i as u8)
}

/// Encode a 20-byte identifier under a lowercase `prefix`.
///
/// # Errors
/// - `InvalidLength` unless `bytes` is exactly 20 bytes
/// - `InvalidPrefix` for an empty or non-lowercase prefix
pub fn encode(prefix: &str, bytes: &[u8]) -> Result<String, CodecError> {
    if bytes.len() != IDENTIFIER_LEN {
        return Err(CodecError::InvalidLength {
            expected: IDENTIFIER_LEN,
            actual: bytes.len(),
        });
    }
    check_prefix(prefix)?;

    let data = convert_bits(bytes, 8, 5, true)?;
    let checksum = create_checksum(prefix, &data);

    let mut out = String::with_capacity(prefix.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(prefix);
    out.push(SEPARATOR);
    for value in data.iter().chain(checksum.iter()) {
        out.push(ALPHABET[usize::from(*value)] as char);
    }
    Ok(out)
}

/// Encode an identifier given as `"0x"` followed by 40 hex characters.
pub fn encode_hex(prefix: &str, hex_identifier: &str) -> Result<String, CodecError> {
    let bytes = parse_hex_identifier(hex_identifier)?;
    encode(prefix, &bytes)
}

/// Parse the `"0x" + 40 hex` form into raw bytes.
pub fn parse_hex_identifier(hex_identifier: &str) -> Result<Identifier, CodecError> {
    let body = hex_identifier
        .strip_prefix("0x")
        .ok_or_else(|| CodecError::InvalidHex(hex_identifier.to_string()))?;
    if body.len() != IDENTIFIER_LEN * 2 {
        return Err(CodecError::InvalidHex(hex_identifier.to_string()));
    }

    let mut bytes = [0u8; IDENTIFIER_LEN];
    hex::decode_to_slice(body, &mut bytes)
        .map_err(|_| CodecError::InvalidHex(hex_identifier.to_string()))?;
    Ok(bytes)
}

/// Decode an address into its lowercase prefix and payload bytes.
///
/// Verifies the checksum; an address with any single character altered
/// is rejected.
pub fn decode(address: &str) -> Result<(String, Vec<u8>), CodecError> {
    if address.len() > MAX_ADDRESS_LEN {
        return Err(CodecError::TooLong(address.len()));
    }
    let has_lower = address.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = address.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(CodecError::MixedCase);
    }
    let address = address.to_ascii_lowercase();

    let split = address.rfind(SEPARATOR).ok_or(CodecError::MissingSeparator)?;
    let (prefix, rest) = address.split_at(split);
    check_prefix(prefix)?;
    let data_part = &rest[1..];
    if data_part.len() < CHECKSUM_LEN {
        return Err(CodecError::TooShort);
    }

    let mut values = Vec::with_capacity(data_part.len());
    for (offset, c) in data_part.bytes().enumerate() {
        let value = alphabet_index(c)
            .ok_or(CodecError::InvalidChar(c as char, split + 1 + offset))?;
        values.push(value);
    }

    if !verify_checksum(prefix, &values) {
        return Err(CodecError::InvalidChecksum);
    }

    let payload = &values[..values.len() - CHECKSUM_LEN];
    let bytes = convert_bits(payload, 5, 8, false)?;
    Ok((prefix.to_string(), bytes))
}

/// True when `address` decodes with a valid checksum.
pub fn verify(address: &str) -> bool {
    decode(address).is_ok()
}

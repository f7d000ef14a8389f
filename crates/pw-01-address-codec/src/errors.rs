//! Codec error types.

use thiserror::Error;

/// Address encoding / decoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Identifier is not exactly 20 bytes.
    #[error("Invalid identifier length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Hex form is not "0x" followed by 40 hex characters.
    #[error("Invalid hex identifier: {0}")]
    InvalidHex(String),

    /// Prefix is empty, too long, or contains characters outside 33..=126.
    #[error("Invalid prefix: {0:?}")]
    InvalidPrefix(String),

    /// Address mixes upper and lower case.
    #[error("Mixed-case address")]
    MixedCase,

    /// No "1" separator between prefix and data.
    #[error("Missing separator")]
    MissingSeparator,

    /// Address longer than 90 characters.
    #[error("Address too long: {0} > 90")]
    TooLong(usize),

    /// Data part shorter than the six checksum symbols.
    #[error("Data part too short")]
    TooShort,

    /// Character outside the 32-symbol alphabet.
    #[error("Invalid character {0:?} at position {1}")]
    InvalidChar(char, usize),

    /// Checksum does not verify.
    #[error("Invalid checksum")]
    InvalidChecksum,

    /// Leftover padding bits are non-zero or too wide.
    #[error("Invalid padding")]
    InvalidPadding,
}

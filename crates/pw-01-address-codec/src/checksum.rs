//! # Polymod Checksum
//!
//! 30-bit BCH checksum over 5-bit symbols, bound to the human-readable prefix.

/// Generator constants for the checksum polynomial.
pub const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

/// Number of 5-bit checksum symbols appended to the data part.
pub const CHECKSUM_LEN: usize = 6;

/// Iterative polynomial reduction over 5-bit values, seeded with 1.
pub fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
        for (i, generator) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
    }
    chk
}

/// Expand a prefix: high 3 bits of each byte, a zero, then the low 5 bits.
pub fn expand_prefix(prefix: &str) -> Vec<u8> {
    let bytes = prefix.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 0x1f));
    out
}

/// Compute the six checksum symbols for `prefix` and 5-bit `data`.
///
/// Six zero placeholders are appended before reduction so the result
/// occupies the low 30 bits of the accumulator.
pub fn create_checksum(prefix: &str, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut values = expand_prefix(prefix);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let modulus = polymod(&values) ^ 1;

    let mut checksum = [0u8; CHECKSUM_LEN];
    for (i, symbol) in checksum.iter_mut().enumerate() {
        *symbol = ((modulus >> (5 * (5 - i))) & 0x1f) as u8;
    }
    checksum
}

/// True when `data` (payload followed by checksum) verifies under `prefix`.
pub fn verify_checksum(prefix: &str, data: &[u8]) -> bool {
    let mut values = expand_prefix(prefix);
    values.extend_from_slice(data);
    polymod(&values) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polymod_empty_is_seed() {
        assert_eq!(polymod(&[]), 1);
    }

    #[test]
    fn test_expand_prefix() {
        // 'a' = 0x61 -> high 3, low 1
        assert_eq!(expand_prefix("a"), vec![3, 0, 1]);
        assert_eq!(expand_prefix("ab"), vec![3, 3, 0, 1, 2]);
    }

    #[test]
    fn test_checksum_verifies() {
        let data = vec![0u8, 1, 2, 3, 31, 30];
        let mut full = data.clone();
        full.extend_from_slice(&create_checksum("cosmos", &data));
        assert!(verify_checksum("cosmos", &full));
    }

    #[test]
    fn test_checksum_bound_to_prefix() {
        let data = vec![7u8; 32];
        let mut full = data.clone();
        full.extend_from_slice(&create_checksum("cosmos", &data));
        assert!(!verify_checksum("osmo", &full));
    }

    #[test]
    fn test_missing_placeholders_gives_different_checksum() {
        let data = vec![1u8, 2, 3];
        let mut values = expand_prefix("cosmos");
        values.extend_from_slice(&data);
        let without = polymod(&values) ^ 1;
        let with = create_checksum("cosmos", &data);
        let packed = with
            .iter()
            .fold(0u32, |acc, s| (acc << 5) | u32::from(*s));
        assert_ne!(packed, without & 0x3fff_ffff);
    }
}
